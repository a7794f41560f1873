//! Activation and password reset emails

use crate::backend::mail::OutgoingEmail;
use crate::shared::AppConfig;

pub fn activation_link(public_url: &str, uid: &str, token: &str) -> String {
    format!(
        "{}/account/register/activate/{}/{}",
        public_url.trim_end_matches('/'),
        uid,
        token
    )
}

pub fn password_reset_link(public_url: &str, uid: &str, token: &str) -> String {
    format!(
        "{}/account/password-reset-confirm/{}/{}",
        public_url.trim_end_matches('/'),
        uid,
        token
    )
}

pub fn activation_email(config: &AppConfig, to: &str, uid: &str, token: &str) -> OutgoingEmail {
    OutgoingEmail {
        from: config.email_from.clone(),
        to: to.to_string(),
        subject: "Activate Your Account".to_string(),
        body: format!(
            "Click the link to activate your account: {}",
            activation_link(&config.public_url, uid, token)
        ),
    }
}

pub fn password_reset_email(config: &AppConfig, to: &str, uid: &str, token: &str) -> OutgoingEmail {
    OutgoingEmail {
        from: config.email_from.clone(),
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        body: format!(
            "Click the link to reset your password: {}",
            password_reset_link(&config.public_url, uid, token)
        ),
    }
}
