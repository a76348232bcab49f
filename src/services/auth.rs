// Mock authentication
//
// Login and registration only check that the forms are filled in sensibly.
// Nothing is stored and nothing is sent anywhere.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Apple,
}

impl SocialProvider {
    pub fn label(self) -> &'static str {
        match self {
            SocialProvider::Google => "Google",
            SocialProvider::Apple => "Apple",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        require("Email", &self.email)?;
        require("Password", &self.password)?;
        check_email(&self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        require("First name", &self.first_name)?;
        require("Last name", &self.last_name)?;
        require("Email", &self.email)?;
        require("Password", &self.password)?;
        require("Confirm password", &self.confirm_password)?;
        check_email(&self.email)?;

        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), AuthError> {
    if !email.contains('@') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
        }
    }

    #[test]
    fn test_login_requires_fields() {
        let form = LoginForm {
            email: "user@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(AuthError::MissingField("Password")));
        assert_eq!(
            LoginForm::default().validate(),
            Err(AuthError::MissingField("Email"))
        );
    }

    #[test]
    fn test_login_email_format() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(form.validate(), Err(AuthError::InvalidEmail));
    }

    #[test]
    fn test_registration_valid() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_registration_password_mismatch() {
        let form = RegistrationForm {
            confirm_password: "other".to_string(),
            ..registration()
        };
        assert_eq!(form.validate(), Err(AuthError::PasswordMismatch));
    }

    #[test]
    fn test_registration_blank_name() {
        let form = RegistrationForm {
            last_name: "   ".to_string(),
            ..registration()
        };
        assert_eq!(form.validate(), Err(AuthError::MissingField("Last name")));
    }
}
