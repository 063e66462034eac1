use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stegamark_engine::placement::Placement;
use stegamark_engine::{image_handler, invisible, lsb, metrics, watermark};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a text message in an image's least-significant bits
    Hide {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        message: String,
    },
    /// Recover a hidden message from an image
    Reveal {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Report how much message an image can carry
    Capacity {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Overlay a visible text watermark
    MarkText {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        text: String,
        #[arg(short, long, value_enum, default_value_t = Placement::BottomRight)]
        position: Placement,
        #[arg(long, default_value_t = 128)]
        opacity: u8,
    },
    /// Overlay a visible logo watermark
    MarkLogo {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        logo: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Placement::BottomRight)]
        position: Placement,
        #[arg(long, default_value_t = 128)]
        opacity: u8,
        #[arg(long, default_value_t = 0.2)]
        scale: f32,
    },
    /// Hide an invisible watermark tag
    Tag {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        tag: String,
    },
    /// Recover an invisible watermark tag
    ExtractTag {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Compare two images and report quality metrics
    Compare {
        #[arg(short, long)]
        original: PathBuf,
        #[arg(short, long)]
        modified: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hide {
            input,
            output,
            message,
        } => {
            let mut buffer = image_handler::load_buffer(&input)?;
            lsb::embed(&mut buffer, &message)?;
            image_handler::save_buffer(&buffer, &output)?;
            println!("Message hidden in {}", output.display());
        }

        Commands::Reveal { input } => {
            let buffer = image_handler::load_buffer(&input)?;
            match lsb::decode(&buffer) {
                Some(message) => println!("{message}"),
                None => eprintln!("No hidden message found."),
            }
        }

        Commands::Capacity { input } => {
            let buffer = image_handler::load_buffer(&input)?;
            let cap = lsb::capacity(&buffer);
            println!(
                "{}x{} ({} channels): {} samples, up to {} bits / {} bytes of message",
                buffer.width(),
                buffer.height(),
                buffer.channels(),
                cap.total_samples,
                cap.max_bits,
                cap.max_bytes
            );
        }

        Commands::MarkText {
            input,
            output,
            text,
            position,
            opacity,
        } => {
            let buffer = image_handler::load_buffer(&input)?;
            let marked = watermark::render_text(&buffer, &text, position, opacity)?;
            image_handler::save_buffer(&marked, &output)?;
            println!("Text watermark written to {}", output.display());
        }

        Commands::MarkLogo {
            input,
            output,
            logo,
            position,
            opacity,
            scale,
        } => {
            let buffer = image_handler::load_buffer(&input)?;
            let logo_buffer = image_handler::load_buffer(&logo)?;
            let marked = watermark::render_image(&buffer, &logo_buffer, position, opacity, scale)?;
            image_handler::save_buffer(&marked, &output)?;
            println!("Logo watermark written to {}", output.display());
        }

        Commands::Tag { input, output, tag } => {
            let mut buffer = image_handler::load_buffer(&input)?;
            invisible::add(&mut buffer, &tag)?;
            image_handler::save_buffer(&buffer, &output)?;
            println!("Invisible watermark written to {}", output.display());
        }

        Commands::ExtractTag { input } => {
            let buffer = image_handler::load_buffer(&input)?;
            match invisible::extract(&buffer) {
                Some(tag) => println!("{tag}"),
                None => eprintln!("No watermark found."),
            }
        }

        Commands::Compare { original, modified } => {
            let a = image_handler::load_buffer(&original)?;
            let b = image_handler::load_buffer(&modified)?;
            let report = metrics::compare(&a, &b)?;
            println!("MSE:             {:.6}", report.mse);
            println!("PSNR:            {:.2} dB", report.psnr);
            println!(
                "Differing:       {} of {} samples ({:.4}%)",
                report.diff_samples, report.total_samples, report.diff_percentage
            );
        }
    }

    Ok(())
}
