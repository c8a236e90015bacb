use secrecy::{ExposeSecret, SecretString};

/// Login for the appliance's NITRO API.
#[derive(Debug)]
pub struct AdcCredentials {
    /// Appliance base URL, e.g. `https://adc.example.com`.
    pub url: String,
    pub username: String,
    pub password: SecretString,
    /// Accept self-signed appliance certificates.
    pub allow_unauthorized_certs: bool,
}

impl AdcCredentials {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            allow_unauthorized_certs: false,
        }
    }

    pub(crate) fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }

    /// `<url>/nitro/v1`, without a trailing slash on the base.
    pub fn api_root(&self) -> String {
        format!("{}/nitro/v1", self.url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let c = AdcCredentials::new("https://adc", "nsroot", "hunter2");
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("nsroot"));
    }

    #[test]
    fn api_root_strips_trailing_slash() {
        let c = AdcCredentials::new("https://adc.example.com/", "u", "p");
        assert_eq!(c.api_root(), "https://adc.example.com/nitro/v1");
    }
}
