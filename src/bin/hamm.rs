//! `hamm` - encode files with the extended Hamming(8,4) code and decode them
//! back, optionally through a simulated noisy channel.
//!
//! # Usage
//!
//! ```bash
//! # Write message.txt as a '0'/'1' codeword stream
//! hamm encode message.txt encoded.txt
//!
//! # Recover the original bytes
//! hamm decode encoded.txt -o message.out
//!
//! # Encode, flip one bit per codeword, decode and report
//! hamm roundtrip message.txt --noise single-per-codeword --seed 7
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use hamming_secded::hamming::{
    bytes_to_bits, parse_bit_text, to_bit_text, LengthPolicy, MatchStrategy, NoiseProfile,
    SecdedCodec,
};

/// Extended Hamming(8,4) encoder and decoder.
#[derive(Parser)]
#[command(name = "hamm")]
#[command(version)]
#[command(about = "Encode and decode files with an extended Hamming(8,4) SECDED code")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct GlobalOptions {
    /// How received words are matched against the codebook.
    #[arg(long, value_enum, default_value_t = StrategyArg::FirstMatch, global = true)]
    strategy: StrategyArg,

    /// Drop trailing bits that do not fill a chunk instead of failing.
    #[arg(long, global = true)]
    truncate: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose", global = true)]
    is_verbose: bool,

    /// Suppress all logging output.
    #[arg(short = 'q', long = "quiet", global = true)]
    is_quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a file into a '0'/'1' text stream of codewords.
    Encode {
        input: PathBuf,
        output: PathBuf,
        /// Overwrite the output file if it exists.
        #[arg(long)]
        force: bool,
    },

    /// Decode a '0'/'1' codeword stream back into bytes.
    Decode {
        input: PathBuf,
        /// Write the recovered bytes here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Encode a file, optionally add noise, then decode and report.
    Roundtrip(RoundtripArgs),
}

#[derive(Args)]
struct RoundtripArgs {
    input: PathBuf,

    /// Also save the (possibly damaged) encoded stream.
    #[arg(long)]
    encoded: Option<PathBuf>,

    /// Noise applied between encoding and decoding.
    #[arg(long, value_enum)]
    noise: Option<NoiseArg>,

    /// Seed for the noise generator.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    FirstMatch,
    Nearest,
}

#[derive(Clone, Copy, ValueEnum)]
enum NoiseArg {
    /// One flip per encoded source byte (16 bits)
    SinglePerByte,
    /// One flip per codeword
    SinglePerCodeword,
    /// Two flips per codeword
    DoublePerCodeword,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FirstMatch => MatchStrategy::FirstMatch,
            StrategyArg::Nearest => MatchStrategy::Nearest,
        }
    }
}

impl From<NoiseArg> for NoiseProfile {
    fn from(arg: NoiseArg) -> Self {
        match arg {
            NoiseArg::SinglePerByte => NoiseProfile::SingleBitPerByte,
            NoiseArg::SinglePerCodeword => NoiseProfile::SingleBitPerCodeword,
            NoiseArg::DoublePerCodeword => NoiseProfile::DoubleBitPerCodeword,
        }
    }
}

impl GlobalOptions {
    fn codec(&self) -> SecdedCodec {
        let policy = if self.truncate {
            LengthPolicy::Truncate
        } else {
            LengthPolicy::Strict
        };
        SecdedCodec::new()
            .with_strategy(self.strategy.into())
            .with_length_policy(policy)
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn write_text(path: &Path, text: &str, overwrite: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}

fn encode(codec: &SecdedCodec, input: &Path, output: &Path, force: bool) -> Result<()> {
    let data = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let encoded = codec.encode(&bytes_to_bits(&data))?;
    write_text(output, &to_bit_text(&encoded), force)?;

    log::info!(
        "encoded {} bytes into {} codewords",
        data.len(),
        encoded.len() / 8
    );
    Ok(())
}

fn decode(codec: &SecdedCodec, input: &Path, output: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let bits = parse_bit_text(&text)?;
    let data = codec
        .decode_to_bytes(&bits)
        .context("message is broken and should be recycled")?;

    match output {
        Some(path) => {
            fs::write(path, &data).with_context(|| format!("failed to write {}", path.display()))
        }
        None => io::stdout()
            .write_all(&data)
            .context("failed to write to stdout"),
    }
}

fn roundtrip(codec: &SecdedCodec, args: &RoundtripArgs) -> Result<bool> {
    log::info!("opening {}", args.input.display());
    let data = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    log::info!("encoding {} bytes", data.len());
    let mut encoded = codec.encode(&bytes_to_bits(&data))?;

    if let Some(noise) = args.noise {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        encoded = NoiseProfile::from(noise).apply(&encoded, &mut rng)?;
    }

    if let Some(path) = &args.encoded {
        write_text(path, &to_bit_text(&encoded), false)?;
    }

    log::info!("decoding {} codewords", encoded.len() / 8);
    match codec.decode_to_bytes(&encoded) {
        Ok(decoded) if decoded == data => Ok(true),
        Ok(_) => {
            log::warn!("decoded message differs from the source");
            Ok(false)
        }
        Err(err) => {
            log::warn!("{}", err);
            Ok(false)
        }
    }
}

fn outcome_message(decoded: bool) -> &'static str {
    if decoded {
        "Successfully decoded."
    } else {
        "Message is broken and should be recycled!"
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.global.is_quiet, cli.global.is_verbose);

    let codec = cli.global.codec();
    match &cli.command {
        Command::Encode {
            input,
            output,
            force,
        } => encode(&codec, input, output, *force)?,
        Command::Decode { input, output } => decode(&codec, input, output.as_deref())?,
        Command::Roundtrip(args) => {
            let decoded = roundtrip(&codec, args)?;
            println!("{}", outcome_message(decoded));
            if !decoded {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_args(input: &Path, noise: Option<NoiseArg>) -> RoundtripArgs {
        RoundtripArgs {
            input: input.to_path_buf(),
            encoded: None,
            noise,
            seed: Some(7),
        }
    }

    #[test]
    fn test_write_text_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encoded.txt");

        write_text(&path, "1100", false).unwrap();
        assert!(write_text(&path, "0011", false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "1100");

        write_text(&path, "11001100", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "11001100");
    }

    #[test]
    fn test_encode_then_decode_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("message.txt");
        let encoded = dir.path().join("encoded.txt");
        let recovered = dir.path().join("message.out");
        fs::write(&source, b"Hello, Hamming!").unwrap();

        let codec = SecdedCodec::new();
        encode(&codec, &source, &encoded, false).unwrap();
        assert!(encode(&codec, &source, &encoded, false).is_err());
        encode(&codec, &source, &encoded, true).unwrap();

        decode(&codec, &encoded, Some(&recovered)).unwrap();
        assert_eq!(fs::read(&recovered).unwrap(), b"Hello, Hamming!");
    }

    #[test]
    fn test_roundtrip_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("message.txt");
        fs::write(&source, b"Test data for Hamming code").unwrap();
        let codec = SecdedCodec::new();

        assert!(roundtrip(&codec, &roundtrip_args(&source, None)).unwrap());
        assert!(roundtrip(
            &codec,
            &roundtrip_args(&source, Some(NoiseArg::SinglePerCodeword))
        )
        .unwrap());
        assert!(roundtrip(
            &codec,
            &roundtrip_args(&source, Some(NoiseArg::SinglePerByte))
        )
        .unwrap());
        assert!(!roundtrip(
            &codec,
            &roundtrip_args(&source, Some(NoiseArg::DoublePerCodeword))
        )
        .unwrap());
    }

    #[test]
    fn test_roundtrip_saves_encoded_stream() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("message.txt");
        let saved = dir.path().join("encoded.txt");
        fs::write(&source, b"A").unwrap();

        let mut args = roundtrip_args(&source, None);
        args.encoded = Some(saved.clone());
        assert!(roundtrip(&SecdedCodec::new(), &args).unwrap());
        assert_eq!(fs::read_to_string(&saved).unwrap(), "1001100111010010");
    }

    #[test]
    fn test_outcome_message() {
        assert_eq!(outcome_message(true), "Successfully decoded.");
        assert_eq!(
            outcome_message(false),
            "Message is broken and should be recycled!"
        );
    }
}
