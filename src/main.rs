use anyhow::{bail, Context, Result};
use bio::alphabets::dna;
use bio::io::fasta;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use gatlab_tools::accessories::align_utils::{edit_dist_range, sam2gapped, SkipMode};
use gatlab_tools::accessories::color_utils::{ColorFormat, ColorGradient, GradientKind};
use gatlab_tools::accessories::fai_utils::{build_fai_file, index_path, IndexedFasta, Region};
use gatlab_tools::accessories::print_utils::pretty_list;
use gatlab_tools::accessories::utils::{cputime, realtime, xzopen};
use gatlab_tools::defaults;
use gatlab_tools::io::sam_records::{SamReader, SamRecord};

#[derive(Parser)]
#[command(name = "gatlab-accessories")]
#[command(about = "Accessory tools for SAM alignments, indexed FASTA files and color gradients", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value_t = defaults::VERBOSITY, global = true)]
    verbosity: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render alignments as gapped ref/aln/read rows
    Gapped {
        /// Read sequence (SEQ)
        #[arg(long, value_name = "SEQ", requires_all = ["cigar", "md"], conflicts_with = "sam")]
        seq: Option<String>,

        /// CIGAR string
        #[arg(long, value_name = "CIGAR")]
        cigar: Option<String>,

        /// MD tag value, without the "MD:Z:" prefix
        #[arg(long, value_name = "MD")]
        md: Option<String>,

        /// SAM file to render, plain or gzipped ('-' for stdin)
        #[arg(long, value_name = "FILE.SAM")]
        sam: Option<PathBuf>,

        /// How to draw skipped regions: full, skip or short
        #[arg(short = 's', long, value_name = "MODE", default_value = defaults::SKIP_MODE)]
        skip_mode: String,

        /// Number of threads (default: all cores)
        #[arg(short = 't', long, value_name = "INT")]
        threads: Option<usize>,
    },

    /// Print the cumulative edit distance along the reference
    EditRange {
        #[arg(long, value_name = "CIGAR")]
        cigar: String,

        #[arg(long, value_name = "MD")]
        md: String,

        /// Maximum number of values shown before eliding the middle
        #[arg(short = 'n', long, value_name = "INT", default_value_t = defaults::PRETTY_LIST_MAX_LEN)]
        max_len: usize,
    },

    /// Fetch sequences from a FASTA file through its .fai index
    Faidx {
        /// Input FASTA file
        #[arg(value_name = "REF.FA")]
        fasta: PathBuf,

        /// Regions as NAME, NAME:START or NAME:START-END (1-based, inclusive)
        #[arg(value_name = "REGION")]
        regions: Vec<String>,

        /// Fetch every sequence whose index line contains this string
        #[arg(short = 'g', long, value_name = "STR")]
        grep: Option<String>,

        /// Output the reverse complement
        #[arg(short = 'i', long)]
        reverse_complement: bool,

        /// Write REF.FA.fai when it does not exist yet
        #[arg(short = 'w', long)]
        write_index: bool,

        /// Bases per output line
        #[arg(short = 'l', long, value_name = "INT", default_value_t = defaults::FASTA_LINE_WIDTH)]
        line_width: usize,
    },

    /// Print a color gradient
    Gradient {
        /// Edge colors, as names or hex codes
        #[arg(value_name = "COLOR", default_values_t = [defaults::GRADIENT_START.to_string(), defaults::GRADIENT_END.to_string()])]
        colors: Vec<String>,

        /// Number of colors
        #[arg(short = 'n', long, value_name = "INT", default_value_t = defaults::GRADIENT_SIZE)]
        num_colors: usize,

        /// linear1 (RGB), linear2 (HSL) or bezier
        #[arg(short = 'k', long, value_name = "KIND", default_value = defaults::GRADIENT_KIND)]
        kind: String,

        /// hex or rgb
        #[arg(short = 'f', long, value_name = "FORMAT", default_value = defaults::GRADIENT_FORMAT)]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Map verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace)
    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None) // Don't show timestamps
        .format_target(false) // Don't show module names
        .init();

    let t_real = realtime();
    let t_cpu = cputime();

    let result = match cli.command {
        Commands::Gapped {
            seq,
            cigar,
            md,
            sam,
            skip_mode,
            threads,
        } => run_gapped(seq, cigar, md, sam, &skip_mode, threads),
        Commands::EditRange { cigar, md, max_len } => run_edit_range(&cigar, &md, max_len),
        Commands::Faidx {
            fasta,
            regions,
            grep,
            reverse_complement,
            write_index,
            line_width,
        } => run_faidx(
            fasta,
            &regions,
            grep.as_deref(),
            reverse_complement,
            write_index,
            line_width,
        ),
        Commands::Gradient {
            colors,
            num_colors,
            kind,
            format,
        } => run_gradient(&colors, num_colors, &kind, &format),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }

    log::debug!(
        "Real time: {:.3} sec; CPU: {:.3} sec",
        realtime() - t_real,
        cputime() - t_cpu
    );
}

fn configure_threads(threads: Option<usize>) {
    let mut num_threads = threads.unwrap_or_else(num_cpus::get);

    if num_threads < 1 {
        log::warn!("Invalid thread count {}, using 1 thread", num_threads);
        num_threads = 1;
    }

    // Reasonable upper bound to prevent accidental resource exhaustion
    let max_threads = num_cpus::get() * 2;
    if num_threads > max_threads {
        log::warn!(
            "Thread count {} exceeds recommended maximum {}, capping at {}",
            num_threads,
            max_threads,
            max_threads
        );
        num_threads = max_threads;
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(_) => log::debug!("Built global Rayon thread pool with {} threads", num_threads),
        Err(e) => log::warn!(
            "Failed to configure thread pool: {} (may already be initialized)",
            e
        ),
    }
}

fn run_gapped(
    seq: Option<String>,
    cigar: Option<String>,
    md: Option<String>,
    sam: Option<PathBuf>,
    skip_mode: &str,
    threads: Option<usize>,
) -> Result<()> {
    let skip_mode: SkipMode = skip_mode.parse()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match (seq, cigar, md, sam) {
        (Some(seq), Some(cigar), Some(md), None) => {
            let gapped = sam2gapped(&seq, &cigar, &md, skip_mode)?;
            writeln!(out, "{}", gapped)?;
        }
        (None, _, _, Some(path)) => {
            configure_threads(threads);
            let input = xzopen(&path).with_context(|| format!("opening {}", path.display()))?;
            let records = SamReader::new(BufReader::new(input))
                .collect::<Result<Vec<SamRecord>, _>>()
                .with_context(|| format!("reading {}", path.display()))?;
            log::info!("Read {} SAM records from {}", records.len(), path.display());

            // par_iter + collect keeps input order
            let rendered: Vec<Option<String>> = records
                .par_iter()
                .map(|record| render_record(record, skip_mode))
                .collect();

            let mut n_rendered = 0usize;
            for block in rendered.into_iter().flatten() {
                writeln!(out, "{}", block)?;
                n_rendered += 1;
            }
            log::info!("Rendered {} alignments", n_rendered);
        }
        _ => bail!("either --seq/--cigar/--md or --sam has to be given"),
    }
    out.flush()?;
    Ok(())
}

fn render_record(record: &SamRecord, skip_mode: SkipMode) -> Option<String> {
    if record.is_unmapped() || !record.has_cigar() {
        log::debug!("{}: unmapped or no CIGAR, skipped", record.query_name);
        return None;
    }
    if record.is_secondary() {
        log::debug!("{}: secondary alignment, skipped", record.query_name);
        return None;
    }
    let Some(md) = record.md_tag() else {
        log::debug!("{}: no MD tag, skipped", record.query_name);
        return None;
    };
    match sam2gapped(&record.seq, &record.cigar, md, skip_mode) {
        Ok(gapped) => Some(format!(
            "{}\t{}:{}\n{}",
            record.query_name, record.ref_name, record.pos, gapped
        )),
        Err(e) => {
            log::warn!("{}: {}", record.query_name, e);
            None
        }
    }
}

fn run_edit_range(cigar: &str, md: &str, max_len: usize) -> Result<()> {
    let range = edit_dist_range(cigar, md)?;
    println!("{}", pretty_list(&range, max_len)?);
    Ok(())
}

fn run_faidx(
    path: PathBuf,
    regions: &[String],
    grep: Option<&str>,
    reverse_complement: bool,
    write_index: bool,
    line_width: usize,
) -> Result<()> {
    if line_width == 0 {
        bail!("line width has to be > 0");
    }
    if write_index && !index_path(&path).exists() {
        build_fai_file(&path).with_context(|| format!("indexing {}", path.display()))?;
    }
    let mut indexed =
        IndexedFasta::open(&path).with_context(|| format!("opening {}", path.display()))?;

    let mut writer = fasta::Writer::new(BufWriter::new(io::stdout().lock()));
    writer.set_linewrap(Some(line_width));
    let mut emit = |name: &str, seq: String| -> Result<()> {
        let seq = if reverse_complement {
            dna::revcomp(seq.as_bytes())
        } else {
            seq.into_bytes()
        };
        let record = fasta::Record::with_attrs(name, None, &seq);
        writer.write_record(&record)?;
        Ok(())
    };

    if let Some(search) = grep {
        let mut n_found = 0usize;
        for entry in indexed.iter_all_seq(search) {
            let (name, seq) = entry?;
            emit(&name, seq)?;
            n_found += 1;
        }
        if n_found == 0 {
            log::warn!("No index line matches {:?}", search);
        }
    }

    for region in regions {
        let region: Region = region.parse()?;
        let seq = indexed
            .fetch(&region)
            .with_context(|| format!("fetching {}", region))?;
        emit(&region.to_string(), seq)?;
    }

    if grep.is_none() && regions.is_empty() && !write_index {
        log::warn!("Nothing to fetch: give regions or --grep");
    }
    drop(emit);
    writer.flush()?;
    Ok(())
}

fn run_gradient(colors: &[String], num_colors: usize, kind: &str, format: &str) -> Result<()> {
    let kind: GradientKind = kind.parse()?;
    let format: ColorFormat = format.parse()?;
    let gradient = ColorGradient::new(colors.iter().map(String::as_str), kind, format)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in gradient.gradient(num_colors, None, None).to_lines() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
