use std::path::PathBuf;

use clap::Parser as _;
use read_ttf::{types::NameId, FontRef, TableProvider};
use teikna::{BuildOptions, GlyphId, TessellatedFont};

#[derive(clap::Parser, Debug)]
#[command(about = "Explore the tables and tessellated outlines of a TrueType font")]
struct Args {
    /// Path to a font file
    font: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List the table directory
    Tables,
    /// Print font wide metrics
    Metrics,
    /// Print the character to glyph mapping
    Charmap,
    /// Print kerning pairs
    Kerning,
    /// Summarize every tessellated glyph
    Glyphs {
        /// Sampling step for quadratic segments, in (0, 1]
        #[arg(long, default_value_t = 0.1)]
        step: f32,
    },
    /// Print the tessellated contours of a single glyph
    Glyph {
        /// Glyph identifier
        gid: u16,
        /// Sampling step for quadratic segments, in (0, 1]
        #[arg(long, default_value_t = 0.1)]
        step: f32,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let data = std::fs::read(&args.font)
        .map_err(|e| Error::new(format!("failed to read {}: {e}", args.font.display())))?;
    match &args.command {
        Command::Tables => list_tables(&data),
        Command::Metrics => print_metrics(&data),
        Command::Charmap => print_charmap(&data),
        Command::Kerning => print_kerning(&data),
        Command::Glyphs { step } => print_glyphs(&data, *step),
        Command::Glyph { gid, step } => print_glyph(&data, *gid, *step),
    }
}

fn list_tables(data: &[u8]) -> Result<(), Error> {
    let font = FontRef::new(data).map_err(Error::new)?;
    println!("Tag  Offset  Length  Checksum");
    println!("-------------------------------");
    for record in font.table_directory.table_records() {
        let offset = record.offset.get();
        println!(
            "{0} 0x{1:02$X} {3:8} 0x{4:08X} ",
            record.tag.get(),
            offset,
            hex_width(offset),
            record.length.get(),
            record.checksum.get(),
        );
    }
    Ok(())
}

fn hex_width(val: u32) -> usize {
    match val {
        0..=0xffff => 4usize,
        0x10000..=0xffffff => 6,
        0x1000000.. => 8,
    }
}

fn print_metrics(data: &[u8]) -> Result<(), Error> {
    let font = FontRef::new(data).map_err(Error::new)?;
    let head = font.head().map_err(Error::new)?;
    println!("units per em: {}", head.units_per_em());
    println!("lowest recommended ppem: {}", head.lowest_rec_ppem());
    if let Ok(maxp) = font.maxp() {
        println!("glyph count: {}", maxp.num_glyphs());
    }
    if let Ok(hhea) = font.hhea() {
        println!("ascender: {}", hhea.ascender().to_i16());
        println!("descender: {}", hhea.descender().to_i16());
        println!("line gap: {}", hhea.line_gap().to_i16());
    }
    if let Ok(name) = font.name() {
        if let Some(full_name) = name.string_for_id(NameId::FULL_NAME) {
            println!("full name: {full_name}");
        }
    }
    Ok(())
}

fn print_charmap(data: &[u8]) -> Result<(), Error> {
    let font = FontRef::new(data).map_err(Error::new)?;
    let cmap = font.cmap().map_err(Error::new)?;
    let subtable = cmap
        .unicode_bmp()
        .ok_or_else(|| Error::new("font has no unicode bmp format 4 subtable"))?;
    for (codepoint, gid) in subtable.iter().filter(|(_, gid)| *gid != GlyphId::NOTDEF) {
        match char::from_u32(codepoint).filter(|ch| !ch.is_control()) {
            Some(ch) => println!("U+{codepoint:04X} '{ch}' {gid}"),
            None => println!("U+{codepoint:04X} {gid}"),
        }
    }
    Ok(())
}

fn print_kerning(data: &[u8]) -> Result<(), Error> {
    let font = FontRef::new(data).map_err(Error::new)?;
    let kern = font.kern().map_err(Error::new)?;
    for (index, subtable) in kern.subtables().enumerate() {
        let direction = if subtable.is_horizontal() {
            "horizontal"
        } else {
            "vertical"
        };
        println!("subtable {index}: format {}, {direction}", subtable.format());
        let Some(format0) = subtable.format0() else {
            continue;
        };
        for pair in format0.pairs() {
            println!(
                "  {} {} {}",
                GlyphId::new(pair.left()),
                GlyphId::new(pair.right()),
                pair.value().to_i16()
            );
        }
    }
    Ok(())
}

fn print_glyphs(data: &[u8], step: f32) -> Result<(), Error> {
    let options = BuildOptions {
        step,
        progress: Some(Box::new(|finished, total| {
            log::info!("tessellated {finished} of {total} glyphs");
        })),
    };
    let font = TessellatedFont::build(data, &options).map_err(Error::new)?;
    for (index, glyph) in font.glyphs().iter().enumerate() {
        let points: usize = glyph.contours.iter().map(|contour| contour.len()).sum();
        let status = if glyph.is_invalid { "  INVALID" } else { "" };
        println!(
            "{} advance {:5} lsb {:5} contours {:3} points {:4}{status}",
            GlyphId::new(index as u16),
            glyph.advance_width,
            glyph.left_side_bearing,
            glyph.contours.len(),
            points,
        );
    }
    report_diagnostics(&font);
    Ok(())
}

fn print_glyph(data: &[u8], gid: u16, step: f32) -> Result<(), Error> {
    let options = BuildOptions {
        step,
        ..Default::default()
    };
    let font = TessellatedFont::build(data, &options).map_err(Error::new)?;
    let gid = GlyphId::new(gid);
    let glyph = font
        .glyph(gid)
        .ok_or_else(|| Error::new(format!("font has no glyph {gid}")))?;
    println!(
        "{gid}: advance {} lsb {}",
        glyph.advance_width, glyph.left_side_bearing
    );
    if glyph.is_invalid {
        println!("glyph failed to decode, contours are empty");
    }
    for (index, contour) in glyph.contours.iter().enumerate() {
        println!("contour {index} ({} points)", contour.len());
        for point in contour {
            println!("  {} {}", point.x, point.y);
        }
    }
    report_diagnostics(&font);
    Ok(())
}

fn report_diagnostics(font: &TessellatedFont) {
    for message in font.diagnostics() {
        eprintln!("warning: {message}");
    }
}

#[derive(Debug)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Error {}
