//! Fixed value sets stored as Postgres enums.
//!
//! Wire form is snake_case. The Russian labels used by the kindergarten's
//! paper records are accepted on input as aliases.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Staff qualification. Also used as the role of an employee within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "qualification", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Qualification {
    #[serde(alias = "Воспитатель детского сада")]
    Teacher,
    #[serde(alias = "Старший воспитатель")]
    SeniorTeacher,
    #[serde(alias = "Методист")]
    Methodist,
    #[serde(alias = "Музыкальный руководитель")]
    MusicDirector,
    #[serde(alias = "Педагог-психолог")]
    Psychologist,
    #[serde(alias = "Логопед")]
    SpeechTherapist,
    #[serde(alias = "Дефектолог")]
    Defectologist,
    #[serde(alias = "Физкультурный руководитель")]
    PeTeacher,
    #[serde(alias = "Помощник воспитателя")]
    TeacherAssistant,
    #[serde(alias = "Заведующий детским садом")]
    KindergartenHead,
}

impl Qualification {
    pub const ALL: [Qualification; 10] = [
        Qualification::Teacher,
        Qualification::SeniorTeacher,
        Qualification::Methodist,
        Qualification::MusicDirector,
        Qualification::Psychologist,
        Qualification::SpeechTherapist,
        Qualification::Defectologist,
        Qualification::PeTeacher,
        Qualification::TeacherAssistant,
        Qualification::KindergartenHead,
    ];
}

/// Age band of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "age_group", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    #[serde(alias = "Младшая")]
    Junior,
    #[serde(alias = "Средняя")]
    Middle,
    #[serde(alias = "Старшая")]
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Junior, AgeGroup::Middle, AgeGroup::Senior];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualification_wire_format() {
        assert_eq!(
            serde_json::to_string(&Qualification::SpeechTherapist).unwrap(),
            r#""speech_therapist""#
        );
        let q: Qualification = serde_json::from_str(r#""kindergarten_head""#).unwrap();
        assert_eq!(q, Qualification::KindergartenHead);
    }

    #[test]
    fn test_qualification_accepts_russian_label() {
        let q: Qualification = serde_json::from_str(r#""Логопед""#).unwrap();
        assert_eq!(q, Qualification::SpeechTherapist);
    }

    #[test]
    fn test_unknown_qualification_is_rejected() {
        assert!(serde_json::from_str::<Qualification>(r#""janitor""#).is_err());
    }

    #[test]
    fn test_age_group_aliases() {
        let g: AgeGroup = serde_json::from_str(r#""Старшая""#).unwrap();
        assert_eq!(g, AgeGroup::Senior);
        assert_eq!(serde_json::to_string(&AgeGroup::Junior).unwrap(), r#""junior""#);
    }

    #[test]
    fn test_all_variants_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        assert!(Qualification::ALL.iter().all(|q| seen.insert(*q)));
        assert_eq!(AgeGroup::ALL.len(), 3);
    }
}
