use super::engine::SubmitResult;

/// Message wording. Both variants drive the same engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme
{
    Classic,
    Cyber,
}

impl Theme
{
    pub fn parse(value: &str) -> Result<Self, String>
    {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Theme::Classic),
            "cyber" => Ok(Theme::Cyber),
            other => Err(format!("Unknown theme '{other}' (expected classic or cyber)")),
        }
    }

    pub fn title(self) -> &'static str
    {
        match self {
            Theme::Classic => "Guess the Number",
            Theme::Cyber => "CODE BREACH",
        }
    }

    pub fn idle(self) -> &'static str
    {
        match self {
            Theme::Classic => "Enter your guess.",
            Theme::Cyber => "INITIALIZE SEQUENCE",
        }
    }

    pub fn incomplete(self) -> &'static str
    {
        match self {
            Theme::Classic => "Please fill in all digits.",
            Theme::Cyber => "INCOMPLETE SEQUENCE. FILL ALL DIGITS.",
        }
    }

    pub fn no_match(self) -> &'static str
    {
        match self {
            Theme::Classic => "No digits in the right place. Try again.",
            Theme::Cyber => "NO MATCH. RETRY SEQUENCE.",
        }
    }

    pub fn partial(self, correct_positions: usize) -> String
    {
        match self {
            Theme::Classic => match correct_positions {
                1 => "1 digit in the right place.".to_string(),
                n => format!("{n} digits in the right place."),
            },
            Theme::Cyber => format!("PARTIAL MATCH: {correct_positions} DIGITS ALIGNED"),
        }
    }

    pub fn won(self, attempts: u32) -> String
    {
        match self {
            Theme::Classic => match attempts {
                1 => "Congratulations! You guessed it on the first try!".to_string(),
                n => format!("Congratulations! You guessed it in {n} attempts!"),
            },
            Theme::Cyber => format!("SYSTEM BREACH SUCCESSFUL! Code cracked in {attempts} attempts"),
        }
    }

    pub fn message_for(self, result: SubmitResult) -> String
    {
        match result {
            SubmitResult::Rejected(_) => self.incomplete().to_string(),
            SubmitResult::Continuing {
                correct_positions: 0,
            } => self.no_match().to_string(),
            SubmitResult::Continuing { correct_positions } => self.partial(correct_positions),
            SubmitResult::Won { attempts, .. } => self.won(attempts),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::games::digits::engine::Rejection;

    #[test]
    fn parse_accepts_known_names()
    {
        assert_eq!(Theme::parse("classic"), Ok(Theme::Classic));
        assert_eq!(Theme::parse(" CYBER "), Ok(Theme::Cyber));
        assert!(Theme::parse("neon").is_err());
    }

    #[test]
    fn messages_follow_result()
    {
        let theme = Theme::Cyber;
        assert_eq!(
            theme.message_for(SubmitResult::Rejected(Rejection::Incomplete)),
            "INCOMPLETE SEQUENCE. FILL ALL DIGITS."
        );
        assert_eq!(
            theme.message_for(SubmitResult::Continuing {
                correct_positions: 0
            }),
            "NO MATCH. RETRY SEQUENCE."
        );
        assert_eq!(
            theme.message_for(SubmitResult::Continuing {
                correct_positions: 2
            }),
            "PARTIAL MATCH: 2 DIGITS ALIGNED"
        );
    }

    #[test]
    fn classic_wording_handles_singular()
    {
        assert_eq!(Theme::Classic.partial(1), "1 digit in the right place.");
        assert_eq!(Theme::Classic.partial(3), "3 digits in the right place.");
        assert_eq!(
            Theme::Classic.message_for(SubmitResult::Won {
                attempts: 5,
                correct_positions: 4,
            }),
            "Congratulations! You guessed it in 5 attempts!"
        );
    }
}
