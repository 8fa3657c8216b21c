//! Render confetti sprites for a palette and save them as a PNG atlas
use confetti::*;
use std::{env, fs::File, io::BufWriter};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

const DEFAULT_PALETTE: [&str; 5] = ["#ff5a5f", "#3ecf8e", "#2d9cdb", "#f2c94c", "#bb6bd9"];
const DEFAULT_SIZE: usize = 32;

#[derive(Debug)]
struct Args {
    output_file: String,
    config: SpriteConfig,
    progress: Option<f32>,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut output_file = None;
        let mut config_file = None;
        let mut colors = Vec::new();
        let mut size = None;
        let mut antialias = false;
        let mut flatness = None;
        let mut progress = None;

        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "sprites".to_owned());
        let mut help = false;
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    help = true;
                    break;
                }
                "-s" => {
                    let value = args.next().ok_or("-s requires argument")?;
                    size = Some(value.parse()?);
                }
                "-a" => antialias = true,
                "-f" => {
                    let value = args.next().ok_or("-f requires argument")?;
                    flatness = Some(value.parse()?);
                }
                "-c" => {
                    config_file = Some(args.next().ok_or("-c requires argument")?);
                }
                "-t" => {
                    let value: f32 = args.next().ok_or("-t requires argument")?.parse()?;
                    progress = Some(value);
                }
                _ if output_file.is_none() => output_file = Some(arg),
                _ => colors.push(arg.parse::<ARGB>()?),
            }
        }
        let output_file = match output_file {
            Some(output_file) if !help => output_file,
            _ => {
                eprintln!("Render confetti sprites and save them as a PNG atlas");
                eprintln!("\nUSAGE:");
                eprintln!(
                    "    {} [-s <size>] [-a] [-f <flatness>] [-c <config.json>] [-t <progress>] <out.png> [<color>...]",
                    cmd
                );
                eprintln!("\nARGS:");
                eprintln!("    -s <size>          sprite size in pixels (default: {})", DEFAULT_SIZE);
                eprintln!("    -a                 enable anti-aliasing");
                eprintln!(
                    "    -f <flatness>      flatness used to approximate circles (default: {})",
                    DEFAULT_FLATNESS
                );
                eprintln!("    -c <config.json>   load palette and options from JSON file");
                eprintln!("    -t <progress>      apply fade out alpha at animation progress [0, 1]");
                eprintln!("    <out.png>          output atlas, one row per color");
                eprintln!("    <color>            #rrggbb or #aarrggbb color");
                std::process::exit(1);
            }
        };

        let mut config = match config_file {
            Some(config_file) => SpriteConfig::from_reader(File::open(config_file)?)?,
            None => SpriteConfig::new(Vec::new(), DEFAULT_SIZE),
        };
        if !colors.is_empty() {
            config.colors = colors;
        }
        if config.colors.is_empty() {
            config.colors = DEFAULT_PALETTE
                .iter()
                .map(|color| color.parse())
                .collect::<Result<_, _>>()?;
        }
        if let Some(size) = size {
            config.size = size;
        }
        if let Some(flatness) = flatness {
            if flatness < MIN_FLATNESS {
                return Err(format!("flatness is expected to be at least {}", MIN_FLATNESS).into());
            }
            config.flatness = flatness;
        }
        config.antialias |= antialias;

        Ok(Args {
            output_file,
            config,
            progress,
        })
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    tracing::debug!(config = ?args.config, "[args]");

    let sprites = args.config.generate()?;
    let mut atlas = tracing::debug_span!("[atlas]")
        .in_scope(|| sprites.atlas())
        .ok_or("atlas is too large")?;
    if let Some(progress) = args.progress {
        let fade = fade_out_curve().interpolate(progress) as Scalar;
        atlas.data_mut().iter_mut().for_each(|color| {
            *color = color.with_coverage(fade);
        });
    }

    let _save = tracing::debug_span!("[save]", file = %args.output_file).entered();
    if args.output_file != "-" {
        atlas.write_png(BufWriter::new(File::create(&args.output_file)?))?;
    } else {
        atlas.write_png(std::io::stdout())?;
    }
    Ok(())
}
