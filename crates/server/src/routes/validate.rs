// Input checks shared by the form-backed routes

use crate::error::{AppError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Something `@` something `.` something, with no whitespace.
pub fn email(value: &str) -> Result<()> {
    let valid = !value.chars().any(char::is_whitespace)
        && value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        });

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ))
    }
}

pub fn password(value: &str) -> Result<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

pub fn required(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
