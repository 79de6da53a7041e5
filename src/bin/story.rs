//! choice-story CLI - prints short hero stories sampled from a probabilistic grammar.

use anyhow::{Context, Result};
use choice_rs::operations::{article, index, join, title_case};
use choice_rs::{Choice, Sampler, Value, of};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "choice-story")]
#[command(version)]
#[command(about = "Sample hero stories from a probabilistic grammar")]
struct Cli {
    /// Seed for reproducible stories (drawn from the OS when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of stories to tell
    #[arg(short = 'n', long, default_value = "1")]
    count: usize,

    /// Verbose output, including every draw
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) -> Result<()> {
    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,choice_rs=trace,choice_story=debug")
        } else {
            EnvFilter::new("info")
        }
    });
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

/// The building blocks of a story. The hero's name, pronouns and occupation are
/// drawn once per story so every mention agrees; everything else is resampled at
/// each use.
struct Grammar {
    name: Choice,
    pronouns: Choice,
    occupation: Choice,
    deeds: Value,
    tale: Choice,
    ending: Choice,
}

fn deed(verb: &str, monster: &Choice) -> Choice {
    join([Value::from(verb), article(monster.clone()).into()])
}

impl Grammar {
    fn new() -> choice_rs::Result<Self> {
        let monster = Choice::flat([
            "dragon", "ogre", "witch", "wizard", "goblin", "golem", "giant", "sphinx", "warlord",
        ])?;

        let deeds = Value::map([
            (
                "baker",
                Choice::flat([
                    "baked bread",
                    "decorated cupcakes",
                    "folded dough",
                    "made croissants",
                    "iced a cake",
                ])?,
            ),
            (
                "warrior",
                Choice::flat([
                    deed("fought ", &monster),
                    deed("saved a village from ", &monster),
                    deed("battled ", &monster),
                    deed("defeated ", &monster),
                ])?,
            ),
        ]);

        Ok(Self {
            name: Choice::flat([
                "cheri", "fox", "morgana", "jedoo", "brick", "shadow", "krox", "urga", "zelph",
            ])?,
            pronouns: Choice::flat([
                Value::map([("their", "their"), ("they", "they")]),
                Value::map([("their", "his"), ("they", "he")]),
                Value::map([("their", "her"), ("they", "she")]),
            ])?,
            occupation: of!["baker", "warrior"]?,
            deeds,
            tale: Choice::weighted(3.0, "song")?
                .or(Choice::weighted(2.0, "saga"))?
                .or(Choice::weighted(1.0, "legend"))?,
            ending: Choice::percentage(70.0, "went home to read a book")?
                .or(Choice::otherwise("set out in search of another adventure", None))?,
        })
    }

    fn tell(&self, sampler: &mut Sampler) -> choice_rs::Result<Value> {
        let hero = self.name.evaluate(sampler.rng())?;
        let pronouns = self.pronouns.evaluate(sampler.rng())?;
        let occupation = self.occupation.evaluate(sampler.rng())?;
        debug!(%hero, %pronouns, %occupation, "cast the hero");

        let deeds = Value::from(index(self.deeds.clone(), occupation.clone()));
        let their = Value::from(index(pronouns.clone(), "their"));
        let they = Value::from(index(pronouns, "they"));
        let hero = Value::from(title_case(hero));

        let story = join([
            hero.clone(),
            Value::from(" was a great "),
            occupation,
            Value::from(" and this "),
            self.tale.clone().into(),
            Value::from(" tells of "),
            their,
            Value::from(" adventure. "),
            hero,
            Value::from(" "),
            deeds.clone(),
            Value::from(", then "),
            they.clone(),
            Value::from(" "),
            deeds,
            Value::from(", then "),
            they,
            Value::from(" "),
            self.ending.clone().into(),
            Value::from("."),
        ]);
        sampler.evaluate(&story.into())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let grammar = Grammar::new().context("Failed to build the story grammar")?;
    let mut sampler = cli.seed.map_or_else(Sampler::from_os_rng, Sampler::seeded);
    info!(seed = ?sampler.seed(), count = cli.count, "Telling stories");

    for number in 1..=cli.count {
        let story = grammar
            .tell(&mut sampler)
            .with_context(|| format!("Failed to tell story {number}"))?;
        let text = story
            .as_str()
            .with_context(|| format!("Story {number} did not render as text: {story}"))?;
        println!("{text}");
    }

    Ok(())
}
