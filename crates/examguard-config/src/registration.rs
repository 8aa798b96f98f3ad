use crate::env;

/// Controls who may create accounts through `POST /api/auth/register`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationConfig {
    /// When false only an admin token may register new users.
    pub allow_self_register: bool,
    /// bcrypt cost.
    pub salt_rounds: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            allow_self_register: false,
            salt_rounds: 10,
        }
    }
}

impl RegistrationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            allow_self_register: env::flag_or("ALLOW_SELF_REGISTER", defaults.allow_self_register),
            // bcrypt accepts 4..=31
            salt_rounds: env::parse_or("PW_SALT_ROUNDS", defaults.salt_rounds).clamp(4, 31),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistrationConfig::default();
        assert!(!config.allow_self_register);
        assert_eq!(config.salt_rounds, 10);
    }
}
