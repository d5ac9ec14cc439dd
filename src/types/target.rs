//! Client-device identities that issued credentials are bound to.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::LoginError;

/// Device class the exchanged credentials are bound to.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TargetApp {
    Web,
    Android,
    Ios,
    Linux,
    Mac,
    #[default]
    Windows,
    Tv,
    AlipayMini,
    WechatMini,
    QAndroid,
}

impl TargetApp {
    /// Parse a user-supplied identity, rejecting anything unrecognized.
    pub fn parse(name: &str) -> Result<Self, LoginError> {
        name.trim()
            .parse()
            .map_err(|_| LoginError::InvalidTargetIdentity(name.to_string()))
    }

    /// All recognized identities, in declaration order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}
