//! Message sender and persona types
//!
//! This module defines the closed set of conversation participants:
//! the human user plus the selectable assistant factions. A persona
//! changes how assistant turns are labelled and framed, not how the
//! gateway behaves.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a conversation turn
///
/// Exactly one tag identifies the author of every message. `User` is the
/// human side; every other variant is an assistant persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human user
    User,

    /// Blue Faction assistant persona
    Blue,

    /// Red Faction assistant persona
    Red,

    /// Green Faction assistant persona
    Green,

    /// Purple Faction assistant persona
    Purple,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Blue => write!(f, "blue"),
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Purple => write!(f, "purple"),
        }
    }
}

impl Sender {
    /// Parse an assistant persona from a string
    ///
    /// Only assistant personas are selectable; "user" is not a valid
    /// persona name.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the persona ("blue", "red", "green", "purple")
    ///
    /// # Returns
    ///
    /// Returns the parsed persona or an error if the string is invalid
    ///
    /// # Examples
    ///
    /// ```
    /// use mdchat::persona::Sender;
    ///
    /// let persona = Sender::parse_persona("blue").unwrap();
    /// assert_eq!(persona, Sender::Blue);
    /// ```
    pub fn parse_persona(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "purple" => Ok(Self::Purple),
            other => Err(format!("Unknown persona: {}", other)),
        }
    }

    /// Returns true if this sender is the human user
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User)
    }

    /// Role string used when building gateway context windows
    ///
    /// The user maps to "user"; every assistant persona maps to "assistant".
    ///
    /// # Examples
    ///
    /// ```
    /// use mdchat::persona::Sender;
    ///
    /// assert_eq!(Sender::User.role(), "user");
    /// assert_eq!(Sender::Green.role(), "assistant");
    /// ```
    pub fn role(&self) -> &'static str {
        match self {
            Self::User => "user",
            _ => "assistant",
        }
    }

    /// Get the display name for this sender
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Blue => "Blue Faction",
            Self::Red => "Red Faction",
            Self::Green => "Green Faction",
            Self::Purple => "Purple Faction",
        }
    }

    /// Get the avatar glyph for this sender
    pub fn avatar(&self) -> &'static str {
        match self {
            Self::User => "👤",
            Self::Blue => "🔵",
            Self::Red => "🔴",
            Self::Green => "🟢",
            Self::Purple => "🟣",
        }
    }

    /// Get a colored tag representation of this sender
    ///
    /// # Returns
    ///
    /// A colored string suitable for display in terminal output
    pub fn colored_tag(&self) -> String {
        match self {
            Self::User => format!("[{}]", "You".bold()),
            Self::Blue => format!("[{}]", "Blue Faction".blue()),
            Self::Red => format!("[{}]", "Red Faction".red()),
            Self::Green => format!("[{}]", "Green Faction".green()),
            Self::Purple => format!("[{}]", "Purple Faction".purple()),
        }
    }

    /// Preamble text sent as the leading request entry for this persona
    ///
    /// Framing only; the sampling configuration is identical for every
    /// persona.
    pub fn preamble(&self) -> &'static str {
        match self {
            Self::User => "",
            Self::Blue => {
                "You are the Blue Faction, a calm and analytical assistant. \
                 Answer in markdown."
            }
            Self::Red => {
                "You are the Red Faction, a bold and direct assistant. \
                 Answer in markdown."
            }
            Self::Green => {
                "You are the Green Faction, a pragmatic and resourceful assistant. \
                 Answer in markdown."
            }
            Self::Purple => {
                "You are the Purple Faction, a creative and curious assistant. \
                 Answer in markdown."
            }
        }
    }
}
