use std::collections::BTreeMap;

use matelog_core::model::{Age, Credentials, Gender, Group, Registration, ScreenKind, Specialty};
use services::AuthFailure;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const REGISTERED_NOTICE: &str = "¡Registro exitoso! Ahora puedes iniciar sesión.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    #[must_use]
    pub fn screen(self) -> ScreenKind {
        match self {
            Self::Login => ScreenKind::Login,
            Self::Register => ScreenKind::Register,
        }
    }

    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Iniciar Sesión",
            Self::Register => "Registrarse",
        }
    }

    #[must_use]
    pub fn fallback_error(self) -> &'static str {
        match self {
            Self::Login => "Error al iniciar sesión",
            Self::Register => "Error al registrar usuario",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthField {
    Username,
    Password,
    PasswordConfirm,
    Group,
    Specialty,
    Gender,
    Age,
}

impl AuthField {
    /// Field name used by the backend in rejection payloads.
    #[must_use]
    pub fn backend_key(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::PasswordConfirm => "password_confirm",
            Self::Group => "grupo",
            Self::Specialty => "especialidad",
            Self::Gender => "genero",
            Self::Age => "edad",
        }
    }

    #[must_use]
    pub fn from_backend_key(key: &str) -> Option<Self> {
        [
            Self::Username,
            Self::Password,
            Self::PasswordConfirm,
            Self::Group,
            Self::Specialty,
            Self::Gender,
            Self::Age,
        ]
        .into_iter()
        .find(|field| field.backend_key() == key)
    }
}

/// Raw contents of the login/register form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub group: Option<Group>,
    pub specialty: Option<Specialty>,
    pub gender: Option<Gender>,
    pub age: Option<Age>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthRequest {
    Login(Credentials),
    Register(Registration),
}

/// Inline errors per field plus an optional banner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthErrors {
    fields: BTreeMap<AuthField, String>,
    general: Option<String>,
}

impl AuthErrors {
    #[must_use]
    pub fn general_message(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            general: Some(message.into()),
        }
    }

    #[must_use]
    pub fn field(&self, field: AuthField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn general(&self) -> Option<&str> {
        self.general.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    /// Typing into a field clears its error.
    pub fn clear_field(&mut self, field: AuthField) {
        self.fields.remove(&field);
    }

    fn insert(&mut self, field: AuthField, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }
}

impl AuthForm {
    /// Checks the form locally; nothing is sent unless this succeeds.
    ///
    /// # Errors
    ///
    /// Returns the inline messages for every field that fails.
    pub fn validate(&self, mode: AuthMode) -> Result<AuthRequest, AuthErrors> {
        let mut errors = AuthErrors::default();

        if self.username.trim().is_empty() {
            errors.insert(AuthField::Username, "El usuario es requerido");
        }
        if self.password.is_empty() {
            errors.insert(AuthField::Password, "La contraseña es requerida");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                AuthField::Password,
                "La contraseña debe tener al menos 6 caracteres",
            );
        }

        if mode == AuthMode::Login {
            return if errors.is_empty() {
                Ok(AuthRequest::Login(Credentials {
                    username: self.username.trim().to_string(),
                    password: self.password.clone(),
                }))
            } else {
                Err(errors)
            };
        }

        if self.password != self.password_confirm {
            errors.insert(AuthField::PasswordConfirm, "Las contraseñas no coinciden");
        }
        if self.group.is_none() {
            errors.insert(AuthField::Group, "Selecciona tu grupo");
        }
        if self.specialty.is_none() {
            errors.insert(AuthField::Specialty, "Selecciona tu especialidad");
        }
        if self.gender.is_none() {
            errors.insert(AuthField::Gender, "Selecciona tu género");
        }
        if self.age.is_none() {
            errors.insert(AuthField::Age, "Selecciona tu edad");
        }

        match (self.group, self.specialty, self.gender, self.age) {
            (Some(group), Some(specialty), Some(gender), Some(age)) if errors.is_empty() => {
                Ok(AuthRequest::Register(Registration {
                    username: self.username.trim().to_string(),
                    password: self.password.clone(),
                    password_confirm: self.password_confirm.clone(),
                    group,
                    specialty,
                    gender,
                    age,
                }))
            }
            _ => Err(errors),
        }
    }
}

/// Maps a refused login or registration onto the form.
///
/// Known backend field names land on their inputs; anything else goes to the
/// banner, verbatim.
#[must_use]
pub fn errors_from_failure(failure: &AuthFailure, mode: AuthMode) -> AuthErrors {
    match failure {
        AuthFailure::Message(message) => AuthErrors::general_message(message.clone()),
        AuthFailure::Fields(fields) => {
            let mut errors = AuthErrors::default();
            let mut unplaced = Vec::new();
            for (key, messages) in fields {
                let text = messages.join(" ");
                match AuthField::from_backend_key(key) {
                    Some(field) if !text.is_empty() => errors.insert(field, text),
                    _ if !text.is_empty() => unplaced.push(text),
                    _ => {}
                }
            }
            if !unplaced.is_empty() {
                errors.general = Some(unplaced.join(" "));
            }
            if errors.is_empty() {
                errors.general = Some(mode.fallback_error().to_string());
            }
            errors
        }
        _ => AuthErrors::general_message(mode.fallback_error()),
    }
}
