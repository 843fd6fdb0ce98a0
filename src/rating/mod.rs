pub mod domain;
pub mod engine;

pub use domain::{RatingOutcome, Transition, Vote, VoteState};
pub use engine::{apply_vote, current_vote};
