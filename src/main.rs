use clap::Parser;
use genome_sequencer::engine::{EngineEventKind, OfflineEngine};
use genome_sequencer::messaging::channels::drain;
use genome_sequencer::sequence::registry::{self, DirectoryProvider, OfflineProvider};
use genome_sequencer::sequence::SequenceProvider;
use genome_sequencer::{Command, LoadSource, SequencerConfig, Session, TrackId};
use ringbuf::traits::Producer;
use std::path::PathBuf;
use std::process::ExitCode;

// Engine time advanced per loop iteration of the offline run
const STEP_SECONDS: f64 = 0.02;

/// Play one or two genes as chords on the offline engine and print what would sound
#[derive(Parser, Debug)]
#[command(name = "genome_sequencer", version)]
struct Args {
    /// Gene symbol or Ensembl id for track 1
    #[arg(long, default_value = "INS")]
    gene1: String,

    /// Gene symbol or Ensembl id for track 2 (track 2 stays silent when omitted)
    #[arg(long)]
    gene2: Option<String>,

    /// Sequence file for track 1, overrides --gene1
    #[arg(long)]
    file1: Option<PathBuf>,

    /// Sequence file for track 2, overrides --gene2
    #[arg(long)]
    file2: Option<PathBuf>,

    /// Directory of <gene id>.fasta files used as the sequence provider
    #[arg(long)]
    provider_dir: Option<PathBuf>,

    /// Tempo in BPM (clamped to 60..=240)
    #[arg(long)]
    bpm: Option<u32>,

    /// Number of ticks to play
    #[arg(long, default_value_t = 16)]
    ticks: u64,

    /// Cycle the base at this index of track 1 before playing (repeatable)
    #[arg(long)]
    mutate: Vec<usize>,

    /// Config file (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write each loaded track as FASTA into this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print UI updates as JSON lines
    #[arg(long)]
    json: bool,

    /// Report where the two tracks differ before playing
    #[arg(long)]
    compare: bool,
}

fn resolve_gene(arg: &str) -> String {
    registry::find_by_name(arg)
        .map(|gene| gene.id.to_string())
        .unwrap_or_else(|| arg.to_string())
}

fn source_for(gene: Option<&str>, file: Option<&PathBuf>) -> std::io::Result<Option<LoadSource>> {
    if let Some(path) = file {
        let contents = std::fs::read_to_string(path)?;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("Custom").to_string();
        return Ok(Some(LoadSource::File { name, contents }));
    }
    Ok(gene.map(|gene| LoadSource::Gene { id: resolve_gene(gene) }))
}

fn run(args: Args) -> genome_sequencer::Result<()> {
    let mut config = SequencerConfig::load_or_default(args.config.as_deref())?;
    if let Some(bpm) = args.bpm {
        config.default_bpm = bpm;
    }
    if !args.mutate.is_empty() {
        config.mutation_enabled = true;
    }
    if args.compare {
        config.compare_enabled = true;
    }

    let provider: Box<dyn SequenceProvider> = match &args.provider_dir {
        Some(dir) => Box::new(DirectoryProvider::new(dir)),
        None => Box::new(OfflineProvider),
    };

    let engine = OfflineEngine::new(config.tempo().bpm() as f64);
    let (mut session, mut ui) = Session::new(config, engine, provider)?;

    let sources = [
        (TrackId::One, source_for(Some(args.gene1.as_str()), args.file1.as_ref())?),
        (TrackId::Two, source_for(args.gene2.as_deref(), args.file2.as_ref())?),
    ];
    for (id, source) in sources {
        let Some(source) = source else { continue };
        session.load(id, source)?;
        for index in args.mutate.iter().filter(|_| id == TrackId::One) {
            session.mutate(id, *index)?;
        }
        // Queued like any UI command: applied on the next tick boundary
        if ui.commands.try_push(Command::Play(id)).is_err() {
            log::warn!("command channel full, {} not started", id);
        }
    }

    if let Some(identity) = session.identity() {
        println!("identity {:.1}%", identity);
        println!("differences {:?}", session.differences(TrackId::One));
    }

    if let Some(dir) = &args.export {
        std::fs::create_dir_all(dir)?;
        for id in TrackId::ALL {
            let track = session.track(id);
            if track.buffer().is_empty() {
                continue;
            }
            let path = dir.join(format!("{}.fasta", track.label()));
            std::fs::write(&path, session.export_fasta(id))?;
            log::info!("exported {} to {}", id, path.display());
        }
    }

    for notification in drain(&mut ui.notifications) {
        eprintln!("[{:?}] {}", notification.level, notification.message);
    }

    let mut dispatched = 0u64;
    while dispatched < args.ticks {
        let remaining = (args.ticks - dispatched) as usize;
        dispatched += session.pump_at_most(remaining)? as u64;
        if !session.transport_state().is_running() {
            break;
        }
        session.engine_mut().advance(STEP_SECONDS);

        for event in session.engine_mut().drain_events() {
            match event.kind {
                EngineEventKind::Chord(pitches) => {
                    let names: Vec<String> = pitches.iter().map(|p| p.to_string()).collect();
                    println!("{} chord [{}] {}", event.at, names.join(", "), event.duration);
                }
                EngineEventKind::Bass(pitch) => {
                    println!("{} bass  {} {}", event.at, pitch, event.duration);
                }
            }
        }

        for update in drain(&mut ui.updates) {
            if args.json {
                match serde_json::to_string(&update) {
                    Ok(line) => println!("{}", line),
                    Err(err) => log::warn!("could not encode update: {}", err),
                }
            }
        }
    }

    session.teardown();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            ExitCode::FAILURE
        }
    }
}
