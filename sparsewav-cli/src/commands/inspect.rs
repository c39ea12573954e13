//! Inspect command

use std::path::Path;

use sparsewav::sparse::inspect;

use crate::progress::{LOOKING_GLASS, print_step};

/// Inspect a recorder file and display its header information
pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let info = inspect(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let header = &info.header;
    let format = &header.wav_format;

    print_step(1, 1, &LOOKING_GLASS, &format!("WAV File: {}", path.display()));
    println!("---------------------------------");
    println!("Compressed:       {}", if info.compressed { "yes" } else { "no" });
    println!("File size:        {} bytes", info.file_size);
    println!("Format code:      {:#06x}", format.format);
    println!("Channels:         {}", format.channels);
    println!("Sample rate:      {} Hz", format.sample_rate);
    println!("Byte rate:        {}", format.byte_rate);
    println!("Bits per sample:  {}", format.bits_per_sample);
    println!("Data size:        {} bytes", header.data.size);

    if info.compressed {
        println!("Markers:          {}", info.marker_count);
        println!("Restored size:    {} bytes", info.restored_data_size);
    }

    if let Some(duration) = info.duration_secs {
        println!("Duration:         {duration:.2} seconds");
    }

    match info.recording_start {
        Some(start) => println!("Recorded at:      {}", start.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Recorded at:      (not found in comment)"),
    }

    println!("Artist:           {}", header.artist);
    println!("Comment:          {}", header.comment);

    Ok(())
}
