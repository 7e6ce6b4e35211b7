#![forbid(unsafe_code)]
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use clap::{Parser, Subcommand};
use releve::{
    io,
    model::{ClockTime, LayerId, RotationSchedule, RotationType, ScheduleLayer, UserId},
    notification::{prepare_handoff_notice, TextNotice},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de calcul d'astreinte (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du planning
    #[arg(long, global = true, default_value = "schedule.json")]
    schedule: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un planning vide
    Init {
        #[arg(long)]
        name: String,
        /// Écraser un planning existant
        #[arg(long)]
        force: bool,
    },

    /// Importer des membres depuis un CSV
    ImportMembers {
        #[arg(long)]
        csv: String,
    },

    /// Ajouter une couche de rotation
    AddLayer {
        #[arg(long)]
        name: String,
        /// daily, weekly, fortnightly ou `<n>d`
        #[arg(long, default_value = "weekly")]
        rotation: String,
        /// Heure de relève HH:MM (UTC)
        #[arg(long, default_value = "09:00")]
        handoff: String,
        /// Date de début AAAA-MM-JJ
        #[arg(long)]
        start: String,
        /// liste "user1,user2,..." dans l'ordre de rotation
        #[arg(long)]
        users: String,
        #[arg(long, default_value_t = 0)]
        precedence: i32,
        /// Fenêtre active, ex. "Mon=09:00-17:00" (répétable)
        #[arg(long)]
        restrict: Vec<String>,
    },

    /// Supprimer une couche
    RemoveLayer {
        #[arg(long)]
        id: String,
    },

    /// Afficher qui est d'astreinte
    Oncall {
        /// RFC3339 UTC (maintenant par défaut)
        #[arg(long)]
        at: Option<String>,
    },

    /// Lister la chronologie fusionnée et optionnellement exporter
    Periods {
        /// RFC3339 UTC
        #[arg(long)]
        start: String,
        /// RFC3339 UTC
        #[arg(long)]
        end: String,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Générer un préavis texte pour la prochaine relève d'un membre
    Notify {
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 2)]
        days_before: i64,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.schedule)?;
    // `init` doit pouvoir écraser un fichier illisible
    let mut schedule = match &cli.cmd {
        Commands::Init { .. } => RotationSchedule::default(),
        _ if storage.exists() => storage.load()?,
        _ => RotationSchedule::default(),
    };

    let code = match cli.cmd {
        Commands::Init { name, force } => {
            if storage.exists() && !force {
                bail!("{} already exists (use --force)", cli.schedule);
            }
            storage.save(&RotationSchedule::new(name))?;
            0
        }
        Commands::ImportMembers { csv } => {
            let members = io::import_members_csv(csv)?;
            for member in members {
                schedule.members.retain(|m| m.id != member.id);
                schedule.members.push(member);
            }
            storage.save(&schedule)?;
            0
        }
        Commands::AddLayer {
            name,
            rotation,
            handoff,
            start,
            users,
            precedence,
            restrict,
        } => {
            let rotation: RotationType = rotation.parse()?;
            let handoff: ClockTime = handoff.parse()?;
            let start = NaiveDate::parse_from_str(&start, "%Y-%m-%d")
                .with_context(|| format!("invalid start date: {start}"))?;
            let users: Vec<UserId> = users
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(UserId::new)
                .collect();
            if users.is_empty() {
                bail!("a layer needs at least one user");
            }
            let mut layer = ScheduleLayer::new(name, rotation, handoff, start, users)
                .with_precedence(precedence);
            for raw in &restrict {
                let (day, from, to) = parse_restriction(raw)?;
                layer = layer.restrict(day, from, to);
            }
            println!("{}", layer.id.as_str());
            schedule.layers.push(layer);
            storage.save(&schedule)?;
            0
        }
        Commands::RemoveLayer { id } => {
            let id = LayerId::new(id);
            let before = schedule.layers.len();
            schedule.layers.retain(|l| l.id != id);
            if schedule.layers.len() == before {
                bail!("unknown layer: {}", id.as_str());
            }
            storage.save(&schedule)?;
            0
        }
        Commands::Oncall { at } => {
            let at = match at {
                Some(raw) => parse_instant(&raw)?,
                None => Utc::now(),
            };
            match schedule.oncall_at(at)? {
                Some(user) => {
                    println!("{} ({})", user, schedule.display_name(&user));
                    0
                }
                None => {
                    println!("-");
                    // Code 2 = personne d'astreinte
                    2
                }
            }
        }
        Commands::Periods {
            start,
            end,
            out_json,
            out_csv,
        } => {
            let start = parse_instant(&start)?;
            let end = parse_instant(&end)?;
            let periods = schedule.periods_between(start, end)?;
            if let Some(path) = out_json {
                io::export_periods_json(path, &periods)?;
            }
            if let Some(path) = out_csv {
                io::export_periods_csv(path, &periods, &schedule)?;
            }
            // impression compacte
            for p in &periods {
                let end = p.end_time.map(|e| e.to_rfc3339()).unwrap_or_else(|| "…".into());
                let who = p.user_id.as_ref().map(|u| u.as_str()).unwrap_or("-");
                println!("{} → {} | {}", p.start_time.to_rfc3339(), end, who);
            }
            0
        }
        Commands::Notify {
            user,
            days_before,
            out,
        } => {
            let renderer = TextNotice;
            let notice = prepare_handoff_notice(
                &schedule,
                &UserId::new(user),
                days_before,
                Utc::now(),
                &renderer,
            )?;
            std::fs::write(&out, notice.content)?;
            println!(
                "Notice generated for {} (relève {}) at {}",
                notice.user_id,
                notice.period.start_time.to_rfc3339(),
                notice.notice_at.to_rfc3339()
            );
            0
        }
    };

    std::process::exit(code);
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse()
        .with_context(|| format!("invalid RFC3339 instant: {raw}"))
}

/// `Mon=09:00-17:00`
fn parse_restriction(raw: &str) -> Result<(Weekday, ClockTime, ClockTime)> {
    let (day, window) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid restriction {raw:?}: expected Day=HH:MM-HH:MM"))?;
    let day: Weekday = day
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid weekday in restriction {raw:?}"))?;
    let (from, to) = window
        .split_once('-')
        .ok_or_else(|| anyhow!("invalid restriction {raw:?}: expected Day=HH:MM-HH:MM"))?;
    Ok((day, from.parse()?, to.parse()?))
}
