use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use voxgen::{
    config::StudioConfig, engines::gemini::GeminiClient, studio::Studio, voices::VOICES,
    RewriteAction, VoiceName,
};

#[derive(Parser, Debug)]
#[command(name = "voxgen")]
#[command(about = "Narrate a script with a Gemini prebuilt voice and save it as WAV")]
struct Args {
    /// Voice to narrate with (Puck, Charon, Kore, Fenrir, Zephyr)
    #[arg(long, value_parser = VoiceName::from_str)]
    voice: Option<VoiceName>,

    /// Rewrite the script before synthesis
    #[arg(long, value_enum)]
    rewrite: Option<RewriteMode>,

    /// Topic to write about with `--rewrite custom`
    #[arg(long, required_if_eq("rewrite", "custom"))]
    topic: Option<String>,

    /// Directory the WAV file is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Print the voice catalog and exit
    #[arg(long)]
    list_voices: bool,

    /// Script text
    text: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RewriteMode {
    Polish,
    Fix,
    Expand,
    PromoStyle,
    StoryStyle,
    Translate,
    Custom,
}

impl RewriteMode {
    fn into_action(self, topic: Option<String>) -> RewriteAction {
        match self {
            RewriteMode::Polish => RewriteAction::Polish,
            RewriteMode::Fix => RewriteAction::Fix,
            RewriteMode::Expand => RewriteAction::Expand,
            RewriteMode::PromoStyle => RewriteAction::PromoStyle,
            RewriteMode::StoryStyle => RewriteAction::StoryStyle,
            RewriteMode::Translate => RewriteAction::Translate,
            RewriteMode::Custom => RewriteAction::Custom {
                topic: topic.unwrap_or_default(),
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.list_voices {
        for profile in &VOICES {
            println!("{:<8} {:?}  {}", profile.name, profile.gender, profile.description);
        }
        return Ok(());
    }

    let config = StudioConfig::from_env();
    let client = GeminiClient::new(&config)?;
    let mut studio = Studio::new(config, client.clone(), client);

    studio.set_script(args.text.join(" "));
    if let Some(voice) = args.voice {
        studio.select_voice(voice);
    }

    if let Some(mode) = args.rewrite {
        let start = Instant::now();
        studio.rewrite(mode.into_action(args.topic)).await?;
        println!("Rewritten in {:.2?}:\n{}\n", start.elapsed(), studio.script().as_str());
    }

    let start = Instant::now();
    let id = studio.generate().await?;
    let synth_dur = start.elapsed();

    if let Some(item) = studio.get(id) {
        println!(
            "Synthesized {:.2}s of audio with {} in {:.2?}",
            item.duration, item.voice, synth_dur
        );
    }

    let path = studio.export(id, &args.out)?;
    println!("Saved to {}", path.display());

    Ok(())
}
