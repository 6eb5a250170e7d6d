//! Stateless commitment engine.

use num_bigint::BigUint;
use tracing::{debug, info};

use crate::bundle::CommitBundle;
use crate::commitment::{commit_image, commit_image_detailed, ImageCommitment};
use crate::error::Result;
use crate::grid::ImageGrid;
use crate::hasher::CircuitHasher;
use crate::merkle::MerkleTree;
use crate::phash::{pack_all, PHash};

/// Bundles a hash backend with the three commitment operations.
///
/// Holds no state besides the hasher, so one engine can serve any number
/// of databases and images.
///
/// ```
/// use num_bigint::BigUint;
/// use zkphash_core::{CommitEngine, ImageGrid, MockHasher, PHash};
///
/// # fn example() -> zkphash_core::Result<()> {
/// let engine = CommitEngine::new(MockHasher::default());
/// let db = vec![PHash::zero(); 3];
/// let bundle = engine.commit(&db, ImageGrid::zeros(), BigUint::from(7u32), 10)?;
/// assert_eq!(bundle.db_phashs.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommitEngine<H> {
    hasher: H,
}

impl<H: CircuitHasher> CommitEngine<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Full Merkle tree over a database, for inspection.
    pub fn merkle_tree(&self, db: &[PHash]) -> Result<MerkleTree> {
        MerkleTree::from_packed(&pack_all(db), &self.hasher)
    }

    /// Merkle root over the packed database (`dbHash`).
    pub fn commit_database(&self, db: &[PHash]) -> Result<BigUint> {
        let tree = self.merkle_tree(db)?;
        debug!(
            entries = db.len(),
            width = tree.width(),
            depth = tree.depth(),
            "Database committed"
        );
        Ok(tree.root().clone())
    }

    /// Image commitment (`imgCommitment`).
    pub fn commit_image(&self, image: &ImageGrid, r2: &BigUint) -> Result<BigUint> {
        commit_image(image, r2, &self.hasher)
    }

    /// Image commitment with every intermediate hash.
    pub fn commit_image_detailed(&self, image: &ImageGrid, r2: &BigUint) -> Result<ImageCommitment> {
        commit_image_detailed(image, r2, &self.hasher)
    }

    /// Compute both commitments and assemble the circuit input bundle.
    pub fn commit(
        &self,
        db: &[PHash],
        image: ImageGrid,
        r2: BigUint,
        threshold: u32,
    ) -> Result<CommitBundle> {
        info!(
            entries = db.len(),
            threshold,
            backend = %self.hasher.backend(),
            "Computing commitments"
        );
        let db_hash = self.commit_database(db)?;
        let img_commitment = self.commit_image(&image, &r2)?;

        Ok(CommitBundle {
            img_commitment,
            db_hash,
            threshold,
            r2,
            image,
            db_phashs: db.to_vec(),
        })
    }
}
