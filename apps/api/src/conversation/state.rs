//! Conversation state: the partially filled applicant record plus the
//! append-only message history of one conversation.
//!
//! Mutators are visible to the `conversation` module only, so the
//! orchestrator is the single writer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::conversation::slots::{Slot, SlotValue};
use crate::models::applicant::{
    AdditionalFactors, ApplicantFactors, CanadianEducation, EducationLevel, LanguageScores,
    SecondLanguage, SpouseFactors,
};
use crate::models::chat::ChatMessage;
use crate::models::score::ScoreBreakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "slot", rename_all = "snake_case")]
pub enum Phase {
    Collecting(Slot),
    Complete,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("value {value:?} does not fit slot {slot:?}")]
pub struct SlotMismatch {
    pub slot: Slot,
    pub value: SlotValue,
}

/// One optional field per slot. `None` means unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantDraft {
    has_spouse: Option<bool>,
    age: Option<u8>,
    education: Option<EducationLevel>,
    listening: Option<u8>,
    reading: Option<u8>,
    writing: Option<u8>,
    speaking: Option<u8>,
    second_language: Option<Option<SecondLanguage>>,
    canadian_work_experience: Option<u32>,
    foreign_work_experience: Option<u32>,
    spouse_education: Option<EducationLevel>,
    spouse_language: Option<LanguageScores>,
    spouse_canadian_work_experience: Option<u32>,
    certificate_of_qualification: Option<bool>,
    sibling_in_canada: Option<bool>,
    canadian_post_secondary: Option<CanadianEducation>,
    provincial_nomination: Option<bool>,
}

impl ApplicantDraft {
    pub fn is_resolved(&self, slot: Slot) -> bool {
        match slot {
            Slot::MaritalStatus => self.has_spouse.is_some(),
            Slot::Age => self.age.is_some(),
            Slot::Education => self.education.is_some(),
            Slot::FirstLanguageListening => self.listening.is_some(),
            Slot::FirstLanguageReading => self.reading.is_some(),
            Slot::FirstLanguageWriting => self.writing.is_some(),
            Slot::FirstLanguageSpeaking => self.speaking.is_some(),
            Slot::SecondLanguage => self.second_language.is_some(),
            Slot::CanadianWorkExperience => self.canadian_work_experience.is_some(),
            Slot::ForeignWorkExperience => self.foreign_work_experience.is_some(),
            Slot::SpouseEducation => self.spouse_education.is_some(),
            Slot::SpouseLanguage => self.spouse_language.is_some(),
            Slot::SpouseCanadianWorkExperience => self.spouse_canadian_work_experience.is_some(),
            Slot::CertificateOfQualification => self.certificate_of_qualification.is_some(),
            Slot::SiblingInCanada => self.sibling_in_canada.is_some(),
            Slot::CanadianPostSecondary => self.canadian_post_secondary.is_some(),
            Slot::ProvincialNomination => self.provincial_nomination.is_some(),
        }
    }

    /// Whether `slot` must be answered on the current marital-status branch.
    pub fn is_required(&self, slot: Slot) -> bool {
        !slot.is_spouse_slot() || self.has_spouse == Some(true)
    }

    /// Slots required on the active branch. Before marital status is known
    /// the spouse block is not counted.
    pub fn required_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        Slot::ORDER
            .into_iter()
            .filter(move |&slot| self.is_required(slot))
    }

    /// First required slot, in question order, that still has no value.
    pub fn next_unresolved(&self) -> Option<Slot> {
        self.required_slots().find(|&slot| !self.is_resolved(slot))
    }

    pub fn resolved_count(&self) -> usize {
        self.required_slots()
            .filter(|&slot| self.is_resolved(slot))
            .count()
    }

    /// Stores a value for exactly one slot.
    pub fn set(&mut self, slot: Slot, value: SlotValue) -> Result<(), SlotMismatch> {
        match (slot, value) {
            (Slot::MaritalStatus, SlotValue::Flag(v)) => self.has_spouse = Some(v),
            (Slot::Age, SlotValue::Age(v)) => self.age = Some(v),
            (Slot::Education, SlotValue::Education(v)) => self.education = Some(v),
            (Slot::FirstLanguageListening, SlotValue::Clb(v)) => self.listening = Some(v),
            (Slot::FirstLanguageReading, SlotValue::Clb(v)) => self.reading = Some(v),
            (Slot::FirstLanguageWriting, SlotValue::Clb(v)) => self.writing = Some(v),
            (Slot::FirstLanguageSpeaking, SlotValue::Clb(v)) => self.speaking = Some(v),
            (Slot::SecondLanguage, SlotValue::SecondLanguage(v)) => self.second_language = Some(v),
            (Slot::CanadianWorkExperience, SlotValue::Years(v)) => {
                self.canadian_work_experience = Some(v)
            }
            (Slot::ForeignWorkExperience, SlotValue::Years(v)) => {
                self.foreign_work_experience = Some(v)
            }
            (Slot::SpouseEducation, SlotValue::Education(v)) => self.spouse_education = Some(v),
            (Slot::SpouseLanguage, SlotValue::Scores(v)) => self.spouse_language = Some(v),
            (Slot::SpouseCanadianWorkExperience, SlotValue::Years(v)) => {
                self.spouse_canadian_work_experience = Some(v)
            }
            (Slot::CertificateOfQualification, SlotValue::Flag(v)) => {
                self.certificate_of_qualification = Some(v)
            }
            (Slot::SiblingInCanada, SlotValue::Flag(v)) => self.sibling_in_canada = Some(v),
            (Slot::CanadianPostSecondary, SlotValue::CanadianEducation(v)) => {
                self.canadian_post_secondary = Some(v)
            }
            (Slot::ProvincialNomination, SlotValue::Flag(v)) => {
                self.provincial_nomination = Some(v)
            }
            (slot, value) => return Err(SlotMismatch { slot, value }),
        }
        Ok(())
    }

    /// Builds the complete record once every required slot is resolved.
    pub fn to_factors(&self) -> Option<ApplicantFactors> {
        let has_spouse = self.has_spouse?;
        let spouse = if has_spouse {
            Some(SpouseFactors {
                education: self.spouse_education?,
                first_language: self.spouse_language?,
                canadian_work_experience: self.spouse_canadian_work_experience?,
            })
        } else {
            None
        };

        Some(ApplicantFactors {
            has_spouse,
            age: self.age?,
            education: self.education?,
            first_language: LanguageScores {
                listening: self.listening?,
                reading: self.reading?,
                writing: self.writing?,
                speaking: self.speaking?,
            },
            second_language: self.second_language?,
            canadian_work_experience: self.canadian_work_experience?,
            foreign_work_experience: self.foreign_work_experience?,
            certificate_of_qualification: self.certificate_of_qualification?,
            spouse,
            additional: AdditionalFactors {
                sibling_in_canada: self.sibling_in_canada?,
                canadian_post_secondary: self.canadian_post_secondary?,
                provincial_nomination: self.provincial_nomination?,
            },
        })
    }
}

/// Final record and score, set exactly once when the conversation completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedAssessment {
    pub factors: ApplicantFactors,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone)]
pub struct ConversationState {
    id: Uuid,
    phase: Phase,
    draft: ApplicantDraft,
    history: Vec<ChatMessage>,
    result: Option<CompletedAssessment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Collecting(Slot::ORDER[0]),
            draft: ApplicantDraft::default(),
            history: Vec::new(),
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn draft(&self) -> &ApplicantDraft {
        &self.draft
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn result(&self) -> Option<&CompletedAssessment> {
        self.result.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(super) fn push_message(&mut self, message: ChatMessage) {
        self.history.push(message);
        self.updated_at = Utc::now();
    }

    /// Records the value for the slot currently being collected and moves to
    /// the next unresolved slot. Returns that slot, or `None` when the record
    /// is complete and ready to score.
    pub(super) fn record(&mut self, value: SlotValue) -> Result<Option<Slot>, SlotMismatch> {
        let slot = match self.phase {
            Phase::Collecting(slot) => slot,
            Phase::Complete => {
                return Err(SlotMismatch {
                    slot: Slot::ORDER[0],
                    value,
                })
            }
        };
        self.draft.set(slot, value)?;
        self.updated_at = Utc::now();

        let next = self.draft.next_unresolved();
        if let Some(next) = next {
            self.phase = Phase::Collecting(next);
        }
        Ok(next)
    }

    pub(super) fn complete(&mut self, assessment: CompletedAssessment) {
        self.phase = Phase::Complete;
        self.result = Some(assessment);
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
