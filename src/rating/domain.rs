// Vote state machine - pure, no storage
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vote requested by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Like,
    Dislike,
}

impl Vote {
    /// Wire encoding: `1` likes, `0` dislikes. Anything else is rejected.
    pub fn from_flag(like: i64) -> Option<Self> {
        match like {
            1 => Some(Self::Like),
            0 => Some(Self::Dislike),
            _ => None,
        }
    }
}

/// What a single user currently holds on a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    #[default]
    None,
    Liked,
    Disliked,
}

impl VoteState {
    /// Stored column value; `None` has no row.
    pub fn as_db(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Liked => Some("like"),
            Self::Disliked => Some("dislike"),
        }
    }

    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("like") => Self::Liked,
            Some("dislike") => Self::Disliked,
            _ => Self::None,
        }
    }

    /// `like_it` as reported on post listings.
    pub fn like_it(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Liked => 1,
            Self::Disliked => -1,
        }
    }

    /// Transition on a vote. Repeating the held vote clears it.
    pub fn apply(self, vote: Vote) -> Transition {
        let (next, likes, dislikes, outcome) = match (self, vote) {
            (Self::Liked, Vote::Like) => (Self::None, -1, 0, RatingOutcome::Indifferent),
            (Self::Disliked, Vote::Like) => (Self::Liked, 1, -1, RatingOutcome::ChangedToLike),
            (Self::None, Vote::Like) => (Self::Liked, 1, 0, RatingOutcome::Created),
            (Self::Disliked, Vote::Dislike) => (Self::None, 0, -1, RatingOutcome::Indifferent),
            (Self::Liked, Vote::Dislike) => {
                (Self::Disliked, -1, 1, RatingOutcome::ChangedToDislike)
            }
            (Self::None, Vote::Dislike) => (Self::Disliked, 0, 1, RatingOutcome::Created),
        };

        Transition {
            from: self,
            to: next,
            likes_delta: likes,
            dislikes_delta: dislikes,
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingOutcome {
    Created,
    ChangedToLike,
    ChangedToDislike,
    Indifferent,
}

impl fmt::Display for RatingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Rating successfully created"),
            Self::ChangedToLike => write!(f, "Rating updated to Like"),
            Self::ChangedToDislike => write!(f, "Rating updated to Dislike"),
            Self::Indifferent => write!(f, "Rating updated to indifferent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: VoteState,
    pub to: VoteState,
    pub likes_delta: i64,
    pub dislikes_delta: i64,
    pub outcome: RatingOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_from_nothing_creates() {
        let t = VoteState::None.apply(Vote::Like);
        assert_eq!(t.to, VoteState::Liked);
        assert_eq!((t.likes_delta, t.dislikes_delta), (1, 0));
        assert_eq!(t.outcome, RatingOutcome::Created);
    }

    #[test]
    fn dislike_from_nothing_creates() {
        let t = VoteState::None.apply(Vote::Dislike);
        assert_eq!(t.to, VoteState::Disliked);
        assert_eq!((t.likes_delta, t.dislikes_delta), (0, 1));
        assert_eq!(t.outcome, RatingOutcome::Created);
    }

    #[test]
    fn repeating_a_vote_goes_indifferent() {
        let t = VoteState::Liked.apply(Vote::Like);
        assert_eq!(t.to, VoteState::None);
        assert_eq!((t.likes_delta, t.dislikes_delta), (-1, 0));
        assert_eq!(t.outcome, RatingOutcome::Indifferent);

        let t = VoteState::Disliked.apply(Vote::Dislike);
        assert_eq!(t.to, VoteState::None);
        assert_eq!((t.likes_delta, t.dislikes_delta), (0, -1));
        assert_eq!(t.outcome, RatingOutcome::Indifferent);
    }

    #[test]
    fn switching_moves_one_count_across() {
        let t = VoteState::Liked.apply(Vote::Dislike);
        assert_eq!(t.to, VoteState::Disliked);
        assert_eq!((t.likes_delta, t.dislikes_delta), (-1, 1));
        assert_eq!(t.outcome, RatingOutcome::ChangedToDislike);

        let t = VoteState::Disliked.apply(Vote::Like);
        assert_eq!(t.to, VoteState::Liked);
        assert_eq!((t.likes_delta, t.dislikes_delta), (1, -1));
        assert_eq!(t.outcome, RatingOutcome::ChangedToLike);
    }

    #[test]
    fn counters_track_state_over_any_sequence() {
        // Replaying a vote sequence, the summed deltas must always equal the
        // contribution of the final state.
        let votes = [
            Vote::Like,
            Vote::Like,
            Vote::Dislike,
            Vote::Like,
            Vote::Dislike,
            Vote::Dislike,
            Vote::Like,
        ];
        let mut state = VoteState::None;
        let (mut likes, mut dislikes) = (0, 0);
        for vote in votes {
            let t = state.apply(vote);
            likes += t.likes_delta;
            dislikes += t.dislikes_delta;
            assert!(likes >= 0 && dislikes >= 0);
            state = t.to;
            assert_eq!(likes, (state == VoteState::Liked) as i64);
            assert_eq!(dislikes, (state == VoteState::Disliked) as i64);
        }
    }

    #[test]
    fn like_flag_decoding() {
        assert_eq!(Vote::from_flag(1), Some(Vote::Like));
        assert_eq!(Vote::from_flag(0), Some(Vote::Dislike));
        assert_eq!(Vote::from_flag(2), None);
        assert_eq!(Vote::from_flag(-1), None);
    }

    #[test]
    fn db_encoding_round_trips_and_like_it() {
        for state in [VoteState::None, VoteState::Liked, VoteState::Disliked] {
            assert_eq!(VoteState::from_db(state.as_db()), state);
        }
        assert_eq!(VoteState::Liked.like_it(), 1);
        assert_eq!(VoteState::Disliked.like_it(), -1);
        assert_eq!(VoteState::None.like_it(), 0);
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(RatingOutcome::Created.to_string(), "Rating successfully created");
        assert_eq!(RatingOutcome::Indifferent.to_string(), "Rating updated to indifferent");
        assert_eq!(RatingOutcome::ChangedToLike.to_string(), "Rating updated to Like");
        assert_eq!(RatingOutcome::ChangedToDislike.to_string(), "Rating updated to Dislike");
    }
}
