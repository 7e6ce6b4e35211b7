use crate::rotation::RotationError;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour un membre d'astreinte
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour une couche de rotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour un planning
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Membre connu du planning (annuaire facultatif, pour l'affichage)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub display_name: String,
}

impl Member {
    pub fn new<S: AsRef<str>, D: Into<String>>(id: S, display_name: D) -> Self {
        Self {
            id: UserId::new(id),
            display_name: display_name.into(),
        }
    }
}

/// Heure murale `HH:MM`, sans date. `24:00` désigne minuit du lendemain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };
    pub const END_OF_DAY: ClockTime = ClockTime { hour: 24, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<Self, RotationError> {
        let valid = (hour < 24 && minute < 60) || (hour == 24 && minute == 0);
        if !valid {
            return Err(RotationError::Format(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Vrai pour la sentinelle `24:00`.
    pub fn is_end_of_day(self) -> bool {
        self.hour == 24
    }
}

impl FromStr for ClockTime {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RotationError::Format(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        let digits = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(h, 2) || !digits(m, 2) || m.len() != 2 {
            return Err(malformed());
        }
        let hour: u8 = h.parse().map_err(|_| malformed())?;
        let minute: u8 = m.parse().map_err(|_| malformed())?;
        Self::new(hour, minute).map_err(|_| malformed())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = RotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Fenêtre horaire d'une journée, sérialisée en paire `["09:00", "17:00"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(ClockTime, ClockTime)", into = "(ClockTime, ClockTime)")]
pub struct RestrictionWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl From<(ClockTime, ClockTime)> for RestrictionWindow {
    fn from((start, end): (ClockTime, ClockTime)) -> Self {
        Self { start, end }
    }
}

impl From<RestrictionWindow> for (ClockTime, ClockTime) {
    fn from(w: RestrictionWindow) -> Self {
        (w.start, w.end)
    }
}

/// Restrictions par jour de semaine (`"Mon"`, `"Tue"`, ...).
///
/// Les fenêtres d'un même jour doivent être fournies triées et sans
/// chevauchement ; elles ne sont jamais retriées.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyRestrictions(HashMap<Weekday, Vec<RestrictionWindow>>);

impl DailyRestrictions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_weekday(&self, day: Weekday) -> &[RestrictionWindow] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ajoute une fenêtre en fin de liste pour ce jour.
    pub fn add(&mut self, day: Weekday, window: RestrictionWindow) {
        self.0.entry(day).or_default().push(window);
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// Cadence de rotation, convertie en nombre de jours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationType {
    Daily,
    Weekly,
    #[serde(alias = "biweekly")]
    Fortnightly,
    Days(u16),
}

impl RotationType {
    pub fn days(self) -> u64 {
        match self {
            RotationType::Daily => 1,
            RotationType::Weekly => 7,
            RotationType::Fortnightly => 14,
            RotationType::Days(n) => u64::from(n),
        }
    }
}

impl FromStr for RotationType {
    type Err = RotationError;

    /// `daily`, `weekly`, `fortnightly`/`biweekly` ou `<n>d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(RotationType::Daily),
            "weekly" => Ok(RotationType::Weekly),
            "fortnightly" | "biweekly" => Ok(RotationType::Fortnightly),
            other => other
                .strip_suffix('d')
                .and_then(|n| n.parse::<u16>().ok())
                .map(RotationType::Days)
                .ok_or_else(|| RotationError::Configuration(format!("unknown rotation type: {s}"))),
        }
    }
}

/// Période de rotation `[start_time, end_time)` (UTC).
///
/// `end_time = None` : période ouverte. `user_id = None` : personne d'astreinte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPeriod {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub user_id: Option<UserId>,
}

impl RotationPeriod {
    pub fn assigned(start: DateTime<Utc>, end: DateTime<Utc>, user: UserId) -> Self {
        Self {
            start_time: start,
            end_time: Some(end),
            user_id: Some(user),
        }
    }

    pub fn unassigned(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_time: start,
            end_time: Some(end),
            user_id: None,
        }
    }

    /// Vrai si la période est terminée à l'instant `t` (fin <= t).
    pub fn ends_at_or_before(&self, t: DateTime<Utc>) -> bool {
        self.end_time.is_some_and(|end| end <= t)
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start_time <= t && !self.ends_at_or_before(t)
    }

    /// Copie de la période sur d'autres bornes, même assignation.
    pub fn slice(&self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            start_time: start,
            end_time: end,
            user_id: self.user_id.clone(),
        }
    }
}

/// Couche de rotation : ordre des membres, cadence, heure de relève.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLayer {
    pub id: LayerId,
    pub name: String,
    #[serde(default)]
    pub precedence: i32,
    pub rotation: RotationType,
    pub handoff_time: ClockTime,
    pub start_date: NaiveDate,
    pub user_ids: Vec<UserId>,
    #[serde(default, skip_serializing_if = "DailyRestrictions::is_empty")]
    pub restrictions: DailyRestrictions,
}

impl ScheduleLayer {
    pub fn new<N: Into<String>>(
        name: N,
        rotation: RotationType,
        handoff_time: ClockTime,
        start_date: NaiveDate,
        user_ids: Vec<UserId>,
    ) -> Self {
        Self {
            id: LayerId::random(),
            name: name.into(),
            precedence: 0,
            rotation,
            handoff_time,
            start_date,
            user_ids,
            restrictions: DailyRestrictions::default(),
        }
    }

    pub fn with_precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Limite la couche à la fenêtre `[start, end]` pour ce jour de semaine.
    pub fn restrict(mut self, day: Weekday, start: ClockTime, end: ClockTime) -> Self {
        self.restrictions.add(day, RestrictionWindow { start, end });
        self
    }
}

/// Planning complet : couches superposées + annuaire des membres
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationSchedule {
    pub id: ScheduleId,
    pub name: String,
    #[serde(default)]
    pub layers: Vec<ScheduleLayer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
}

impl Default for RotationSchedule {
    fn default() -> Self {
        Self::new("default")
    }
}

impl RotationSchedule {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: ScheduleId::random(),
            name: name.into(),
            layers: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn find_member<'a>(&'a self, id: &UserId) -> Option<&'a Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Libellé affichable : nom du membre s'il est connu, sinon l'identifiant.
    pub fn display_name<'a>(&'a self, id: &'a UserId) -> &'a str {
        self.find_member(id)
            .map(|m| m.display_name.as_str())
            .unwrap_or_else(|| id.as_str())
    }

    /// Vrai si l'utilisateur figure dans au moins une couche.
    pub fn knows_user(&self, id: &UserId) -> bool {
        self.layers.iter().any(|l| l.user_ids.contains(id)) || self.find_member(id).is_some()
    }
}
