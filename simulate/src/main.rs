#![warn(clippy::pedantic, clippy::style)]

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rand::{thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rodal::{
    action::Action,
    agent::{
        plan::{solve, Plan},
        rollout::{rollout, Episode},
        Constant,
        Uniform,
    },
    env::{StandEnv, StepError},
    site::{AgeAdvance, ConfigError, SiteParams, SITE_INDEX, SURVIVAL},
};
use summary::Summary;

mod summary;

#[derive(Parser, Debug)]
struct Args {
    /// Number of rotations to simulate
    #[arg(long, default_value_t = 10_000)]
    episodes: usize,
    /// Seed for the whole run, random if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// How the stand is managed
    #[arg(long, value_enum, default_value_t = PolicyKind::Optimal)]
    policy: PolicyKind,
    /// How far the age moves after each decision period
    #[arg(long, value_enum, default_value_t = Advance::Year)]
    age_advance: Advance,
    /// Decision limit per rotation
    #[arg(long, default_value_t = 100)]
    max_steps: usize,
    #[arg(long, default_value_t = SITE_INDEX)]
    site_index: f64,
    #[arg(long, default_value_t = SURVIVAL)]
    survival: f64,
    /// Discount used when solving for the optimal plan
    #[arg(long, default_value_t = 1.0)]
    discount: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    /// Uniformly random actions
    Uniform,
    /// Never thin, harvest at the maximum age
    Never,
    /// Follow the solved plan
    Optimal,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Advance {
    Year,
    Period,
}

impl From<Advance> for AgeAdvance {
    fn from(value: Advance) -> Self {
        match value {
            Advance::Year => Self::Year,
            Advance::Period => Self::Period,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("{args:?}");

    let site = match site_from_args(&args) {
        Ok(site) => site,
        Err(err) => {
            log::error!("invalid site parameters: {err}");
            return ExitCode::FAILURE;
        }
    };

    let seed: u64 = args.seed.unwrap_or_else(|| thread_rng().gen());
    log::info!("seed: {seed}");

    let plan = solve(&site, site.horizon(), args.discount);
    if args.policy == PolicyKind::Optimal {
        println!("{plan}");
    }

    let episodes: Result<Vec<_>, _> = (0..args.episodes)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(i as u64);
            play(&site, &plan, args.policy, args.max_steps, &mut rng)
        })
        .collect();
    let episodes = match episodes {
        Ok(episodes) => episodes,
        Err(err) => {
            log::error!("rollout failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let summary: Summary = episodes.iter().map(Summary::from).sum();
    log::info!("{:?}: {summary}", args.policy);
    for &density in site.planting_densities.iter() {
        let by_density: Summary = episodes
            .iter()
            .filter(|episode| (episode.planting_density - density).abs() < f64::EPSILON)
            .map(Summary::from)
            .sum();
        log::info!("{density} trees/ha: {by_density}");
    }
    if summary.truncated > 0 {
        log::warn!(
            "{} rotations were still standing after {} decisions",
            summary.truncated,
            args.max_steps
        );
    }
    ExitCode::SUCCESS
}

fn site_from_args(args: &Args) -> Result<SiteParams, ConfigError> {
    let site = SiteParams::default()
        .with_site_index(args.site_index)
        .with_survival(args.survival)
        .with_age_advance(args.age_advance.into());
    site.validate()?;
    Ok(site)
}

fn play(
    site: &SiteParams,
    plan: &Plan,
    policy: PolicyKind,
    max_steps: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Episode, StepError> {
    let mut env: StandEnv = StandEnv::new(site.clone(), Some(rng.gen()))
        .expect("site parameters should already be validated");
    match policy {
        PolicyKind::Uniform => rollout(&mut env, &mut Uniform::default(), rng, max_steps),
        PolicyKind::Never => rollout(&mut env, &mut Constant(Action::NoAction), rng, max_steps),
        PolicyKind::Optimal => rollout(&mut env, &mut plan.follow(), rng, max_steps),
    }
}
