pub mod git;
pub mod inventory;
pub mod publish;
pub mod scrub;
