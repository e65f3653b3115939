use std::fmt;

use super::FeedbackError;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// A feedback score, guaranteed to lie in `MIN_SCORE..=MAX_SCORE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = FeedbackError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => Ok(Score(score)),
            _ => Err(FeedbackError::InvalidScore(value)),
        }
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        i64::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_score_in_range() {
        for value in 1..=5i64 {
            let score = Score::try_from(value).expect("valid score");
            assert_eq!(i64::from(score), value);
        }
    }

    #[test]
    fn rejects_scores_out_of_range() {
        for value in [0, 6, -1, 255, 256, i64::MIN, i64::MAX] {
            assert_eq!(
                Score::try_from(value),
                Err(FeedbackError::InvalidScore(value))
            );
        }
    }

    #[test]
    fn invalid_score_message_names_the_bounds() {
        let err = Score::try_from(7).unwrap_err();
        assert_eq!(err.to_string(), "score must be between 1 and 5, got 7");
    }
}
