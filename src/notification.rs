use crate::model::{RotationPeriod, RotationSchedule, UserId};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};

/// Horizon de recherche de la prochaine prise d'astreinte.
const LOOKAHEAD_DAYS: i64 = 92;

/// Préavis généré pour une prise d'astreinte.
#[derive(Debug, Clone)]
pub struct HandoffNotice {
    pub user_id: UserId,
    pub period: RotationPeriod,
    pub notice_at: DateTime<Utc>,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, SMS, etc.).
pub trait NoticeRenderer {
    fn render(
        &self,
        schedule: &RotationSchedule,
        user: &UserId,
        period: &RotationPeriod,
        notice_at: DateTime<Utc>,
    ) -> String;
}

/// Gabarit texte simple destiné à un futur mail/SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn render(
        &self,
        schedule: &RotationSchedule,
        user: &UserId,
        period: &RotationPeriod,
        notice_at: DateTime<Utc>,
    ) -> String {
        let end = period
            .end_time
            .map(|e| e.to_rfc3339())
            .unwrap_or_else(|| "fin non définie".to_string());
        format!(
            "Bonjour {name},\n\nTu prends la relève sur le planning \"{schedule}\" du {start} au {end}.\nCe message est généré le {notice}.\n\nMerci de te préparer et de vérifier ton matériel.\n",
            name = schedule.display_name(user),
            schedule = schedule.name,
            start = period.start_time.to_rfc3339(),
            notice = notice_at.to_rfc3339()
        )
    }
}

/// Prépare un préavis pour la prochaine prise d'astreinte d'un membre.
pub fn prepare_handoff_notice(
    schedule: &RotationSchedule,
    user: &UserId,
    days_before: i64,
    now: DateTime<Utc>,
    renderer: &dyn NoticeRenderer,
) -> Result<HandoffNotice> {
    if days_before < 0 {
        bail!("days_before must be positive");
    }
    if !schedule.knows_user(user) {
        bail!("unknown user: {user}");
    }

    let horizon = now + Duration::days(LOOKAHEAD_DAYS);
    let periods = schedule
        .periods_between(now, horizon)
        .with_context(|| format!("resolving schedule {}", schedule.name))?;

    let period = periods
        .into_iter()
        .filter(|p| p.start_time >= now && p.start_time <= horizon)
        .find(|p| p.user_id.as_ref() == Some(user))
        .with_context(|| format!("no upcoming rotation found for user {user}"))?;

    let notice_at = period.start_time - Duration::days(days_before);
    let content = renderer.render(schedule, user, &period, notice_at);
    Ok(HandoffNotice {
        user_id: user.clone(),
        period,
        notice_at,
        content,
    })
}
