use std::{
    fs::File,
    io::{
        self,
        BufReader,
        BufWriter,
        Read,
        Write,
    },
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use ff2sixel::{
    FarbfeldReader,
    PixelSource,
    SixelEncoder128,
    SixelEncoder16,
    SixelEncoder256,
    SixelEncoder32,
    SixelEncoder4,
    SixelEncoder64,
    SixelEncoder8,
    SixelEncoderMono,
};
use strum::{
    Display,
    EnumString,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
enum InputFormat {
    #[strum(serialize = "farbfeld", serialize = "ff")]
    Farbfeld,
    /// Any container the `image` crate can decode.
    Auto,
}

/// Convert an image to a sixel stream on stdout.
#[derive(Debug, Parser)]
struct Args {
    /// The image to encode. Reads stdin when absent or `-`.
    input: Option<PathBuf>,

    /// How to interpret the input.
    #[clap(long, short, default_value_t = InputFormat::Farbfeld)]
    format: InputFormat,

    /// The number of color registers to use, rounded to the nearest power of
    /// 2.
    #[clap(long, short, default_value_t = 256)]
    palette_size: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let input = open_input(args.input.as_ref())?;
    let out = BufWriter::new(io::stdout().lock());

    let mut out = match args.format {
        InputFormat::Farbfeld => {
            let mut reader = FarbfeldReader::new(input).context("failed to read farbfeld header")?;
            encode(&mut reader, out, args.palette_size)?
        }
        InputFormat::Auto => encode_decoded(input, out, args.palette_size)?,
    };

    out.flush().context("failed to write sixel output")?;
    Ok(())
}

fn open_input(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Read>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

#[cfg(feature = "image")]
fn encode_decoded<W: Write>(mut input: impl Read, out: W, palette_size: usize) -> anyhow::Result<W> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .context("failed to read input")?;

    let image = ff2sixel::image_source::decode_image(&bytes)?.to_rgba16();
    let mut rows = ff2sixel::ImageRows::new(&image);
    encode(&mut rows, out, palette_size)
}

#[cfg(not(feature = "image"))]
fn encode_decoded<W: Write>(_: impl Read, _: W, _: usize) -> anyhow::Result<W> {
    anyhow::bail!("decoding arbitrary images requires the `image` feature")
}

fn encode<S: PixelSource, W: Write>(
    source: &mut S,
    out: W,
    palette_size: usize,
) -> anyhow::Result<W> {
    let (width, height) = source.dimensions();
    log::info!("encoding {width}x{height} image with palette size {palette_size}");

    let out = match palette_size {
        0..3 => <SixelEncoderMono>::encode(source, out),
        3..6 => <SixelEncoder4>::encode(source, out),
        6..12 => <SixelEncoder8>::encode(source, out),
        12..24 => <SixelEncoder16>::encode(source, out),
        24..48 => <SixelEncoder32>::encode(source, out),
        48..86 => <SixelEncoder64>::encode(source, out),
        86..192 => <SixelEncoder128>::encode(source, out),
        _ => <SixelEncoder256>::encode(source, out),
    }?;

    Ok(out)
}
