pub mod presence;
pub mod similarity;

pub use presence::PresenceMatrix;
pub use similarity::{compute_similarity, SimilarityMatrix};
