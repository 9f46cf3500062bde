use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Academic credits a course is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "u8", into = "u8")]
#[repr(i32)]
pub enum Credits {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl TryFrom<u8> for Credits {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Credits::One),
            2 => Ok(Credits::Two),
            3 => Ok(Credits::Three),
            4 => Ok(Credits::Four),
            other => Err(format!("credits must be between 1 and 4, got {}", other)),
        }
    }
}

impl From<Credits> for u8 {
    fn from(credits: Credits) -> Self {
        credits as u8
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Semester a student is currently taking, first through twelfth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "u8", into = "u8")]
#[repr(i32)]
pub enum Semester {
    First = 1,
    Second = 2,
    Third = 3,
    Fourth = 4,
    Fifth = 5,
    Sixth = 6,
    Seventh = 7,
    Eighth = 8,
    Ninth = 9,
    Tenth = 10,
    Eleventh = 11,
    Twelfth = 12,
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let semester = match value {
            1 => Semester::First,
            2 => Semester::Second,
            3 => Semester::Third,
            4 => Semester::Fourth,
            5 => Semester::Fifth,
            6 => Semester::Sixth,
            7 => Semester::Seventh,
            8 => Semester::Eighth,
            9 => Semester::Ninth,
            10 => Semester::Tenth,
            11 => Semester::Eleventh,
            12 => Semester::Twelfth,
            other => return Err(format!("semester must be between 1 and 12, got {}", other)),
        };
        Ok(semester)
    }
}

impl From<Semester> for u8 {
    fn from(semester: Semester) -> Self {
        semester as u8
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Two-hour teaching block a course is scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum ScheduleSlot {
    #[serde(rename = "07-09")]
    #[sqlx(rename = "07-09")]
    SevenToNine,
    #[serde(rename = "09-11")]
    #[sqlx(rename = "09-11")]
    NineToEleven,
    #[serde(rename = "11-13")]
    #[sqlx(rename = "11-13")]
    ElevenToOne,
    #[serde(rename = "14-16")]
    #[sqlx(rename = "14-16")]
    TwoToFour,
    #[serde(rename = "16-18")]
    #[sqlx(rename = "16-18")]
    FourToSix,
    #[serde(rename = "18-20")]
    #[sqlx(rename = "18-20")]
    SixToEight,
}

impl ScheduleSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleSlot::SevenToNine => "07-09",
            ScheduleSlot::NineToEleven => "09-11",
            ScheduleSlot::ElevenToOne => "11-13",
            ScheduleSlot::TwoToFour => "14-16",
            ScheduleSlot::FourToSix => "16-18",
            ScheduleSlot::SixToEight => "18-20",
        }
    }
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an enrollment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Enrolled,
    Withdrawn,
    Completed,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "ENROLLED",
            EnrollmentStatus::Withdrawn => "WITHDRAWN",
            EnrollmentStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENROLLED" => Ok(EnrollmentStatus::Enrolled),
            "WITHDRAWN" => Ok(EnrollmentStatus::Withdrawn),
            "COMPLETED" => Ok(EnrollmentStatus::Completed),
            other => Err(format!("unknown enrollment status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits_out_of_range_is_rejected() {
        assert_eq!(Credits::try_from(3), Ok(Credits::Three));
        assert!(Credits::try_from(0).is_err());
        assert!(Credits::try_from(5).is_err());
        assert!(serde_json::from_str::<Credits>("7").is_err());
        assert_eq!(serde_json::to_string(&Credits::Four).unwrap(), "4");
    }

    #[test]
    fn test_semester_bounds() {
        assert_eq!(Semester::try_from(12), Ok(Semester::Twelfth));
        assert!(Semester::try_from(13).is_err());
        assert_eq!(serde_json::from_str::<Semester>("1").unwrap(), Semester::First);
    }

    #[test]
    fn test_schedule_slot_wire_format() {
        let slot: ScheduleSlot = serde_json::from_str("\"14-16\"").unwrap();
        assert_eq!(slot, ScheduleSlot::TwoToFour);
        assert_eq!(serde_json::to_string(&ScheduleSlot::SevenToNine).unwrap(), "\"07-09\"");
        assert!(serde_json::from_str::<ScheduleSlot>("\"13-15\"").is_err());
    }

    #[test]
    fn test_enrollment_status_text() {
        assert_eq!(serde_json::to_string(&EnrollmentStatus::Withdrawn).unwrap(), "\"WITHDRAWN\"");
        assert_eq!("COMPLETED".parse::<EnrollmentStatus>(), Ok(EnrollmentStatus::Completed));
        assert!("DROPPED".parse::<EnrollmentStatus>().is_err());
    }
}
