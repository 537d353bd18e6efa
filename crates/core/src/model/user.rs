use serde::{Deserialize, Serialize};

use crate::model::UserId;

/// Class group a student belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    A,
    B,
    C,
    D,
}

/// Technical specialty the student is enrolled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialty {
    Informatica,
    Agronomia,
    Administracion,
    Electronica,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
    #[serde(rename = "N")]
    Undisclosed,
}

/// Age bracket offered at registration (the platform targets 14 to 18).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Age {
    #[serde(rename = "14")]
    Fourteen,
    #[serde(rename = "15")]
    Fifteen,
    #[serde(rename = "16")]
    Sixteen,
    #[serde(rename = "17")]
    Seventeen,
    #[serde(rename = "18")]
    Eighteen,
}

/// Shared shape for the registration dropdowns: wire code plus display label.
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn code(self) -> &'static str;
    fn label(self) -> &'static str;

    #[must_use]
    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.code() == code)
    }
}

impl Choice for Group {
    const ALL: &'static [Self] = &[Self::A, Self::B, Self::C, Self::D];

    fn code(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::A => "Grupo A",
            Self::B => "Grupo B",
            Self::C => "Grupo C",
            Self::D => "Grupo D",
        }
    }
}

impl Choice for Specialty {
    const ALL: &'static [Self] = &[
        Self::Informatica,
        Self::Agronomia,
        Self::Administracion,
        Self::Electronica,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::Informatica => "INFORMATICA",
            Self::Agronomia => "AGRONOMIA",
            Self::Administracion => "ADMINISTRACION",
            Self::Electronica => "ELECTRONICA",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Informatica => "Informática",
            Self::Agronomia => "Agronomía",
            Self::Administracion => "Administración",
            Self::Electronica => "Electrónica",
        }
    }
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Self::Male, Self::Female, Self::Other, Self::Undisclosed];

    fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
            Self::Undisclosed => "N",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Male => "Masculino",
            Self::Female => "Femenino",
            Self::Other => "Otro",
            Self::Undisclosed => "Prefiero no decir",
        }
    }
}

impl Choice for Age {
    const ALL: &'static [Self] = &[
        Self::Fourteen,
        Self::Fifteen,
        Self::Sixteen,
        Self::Seventeen,
        Self::Eighteen,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::Fourteen => "14",
            Self::Fifteen => "15",
            Self::Sixteen => "16",
            Self::Seventeen => "17",
            Self::Eighteen => "18",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Fourteen => "14 años",
            Self::Fifteen => "15 años",
            Self::Sixteen => "16 años",
            Self::Seventeen => "17 años",
            Self::Eighteen => "18 años",
        }
    }
}

/// The signed-in student as reported by the backend.
///
/// The login response only carries id, username, group and specialty, so the
/// remaining demographic fields are optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(rename = "grupo", default)]
    pub group: Option<Group>,
    #[serde(rename = "especialidad", default)]
    pub specialty: Option<Specialty>,
    #[serde(rename = "genero", default)]
    pub gender: Option<Gender>,
    #[serde(rename = "edad", default)]
    pub age: Option<Age>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(rename = "grupo")]
    pub group: Group,
    #[serde(rename = "especialidad")]
    pub specialty: Specialty,
    #[serde(rename = "genero")]
    pub gender: Gender,
    #[serde(rename = "edad")]
    pub age: Age,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_user_without_demographics_parses() {
        let user: User = serde_json::from_str(
            r#"{"id": 3, "username": "ana", "grupo": "B", "especialidad": "AGRONOMIA"}"#,
        )
        .unwrap();
        assert_eq!(user.group, Some(Group::B));
        assert_eq!(user.specialty, Some(Specialty::Agronomia));
        assert_eq!(user.age, None);
    }

    #[test]
    fn registration_uses_backend_field_names() {
        let registration = Registration {
            username: "ana".into(),
            password: "secreto1".into(),
            password_confirm: "secreto1".into(),
            group: Group::A,
            specialty: Specialty::Informatica,
            gender: Gender::Undisclosed,
            age: Age::Sixteen,
        };
        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["grupo"], "A");
        assert_eq!(json["especialidad"], "INFORMATICA");
        assert_eq!(json["genero"], "N");
        assert_eq!(json["edad"], "16");
    }

    #[test]
    fn choice_codes_round_trip() {
        for age in Age::ALL {
            assert_eq!(Age::from_code(age.code()), Some(*age));
        }
        assert_eq!(Gender::from_code("X"), None);
    }
}
