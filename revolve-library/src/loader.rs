//! Audio file loading and decoding

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::catalog::Track;

/// Errors that can occur during track loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No audio track found in file")]
    NoAudioTrack,
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Track metadata
#[derive(Debug, Clone, Default)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// A loaded and decoded audio track
#[derive(Debug)]
pub struct LoadedTrack {
    /// Interleaved stereo samples (f32, normalized to -1.0 to 1.0)
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Track metadata
    pub metadata: TrackMetadata,
}

/// Result of a background decode, tagged with the load generation so the
/// app can discard completions for tracks that were replaced mid-decode
pub struct DecodeOutcome {
    pub generation: u64,
    pub track: Track,
    pub result: Result<LoadedTrack, LoadError>,
}

/// Audio file loader using Symphonia
pub struct TrackLoader {
    target_sample_rate: u32,
}

impl Default for TrackLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackLoader {
    /// Create a new track loader with default 48kHz sample rate
    pub fn new() -> Self {
        Self::with_sample_rate(48_000)
    }

    /// Create a new track loader with specific sample rate
    pub fn with_sample_rate(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Decode a track on a background thread
    ///
    /// Fire-and-forget relative to the UI: the outcome arrives on the
    /// returned channel whenever decoding finishes (or fails).
    pub fn load_async(&self, track: Track, generation: u64) -> Receiver<DecodeOutcome> {
        let (tx, rx) = bounded(1);
        let target_rate = self.target_sample_rate;
        thread::spawn(move || {
            let loader = TrackLoader::with_sample_rate(target_rate);
            let result = loader.load(&track.path);
            if let Err(ref e) = result {
                tracing::warn!(path = %track.path.display(), error = %e, "decode failed");
            }
            let _ = tx.send(DecodeOutcome {
                generation,
                track,
                result,
            });
        });
        rx
    }

    /// Load and decode an audio file
    pub fn load(&self, path: &Path) -> Result<LoadedTrack, LoadError> {
        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| LoadError::Decode(e.to_string()))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(LoadError::NoAudioTrack)?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let source_sample_rate = codec_params.sample_rate.unwrap_or(44_100);
        let channels = codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(2);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| LoadError::Decode(e.to_string()))?;

        let mut metadata = extract_metadata(&mut format, path);
        metadata.sample_rate = source_sample_rate;
        metadata.channels = channels;

        // Decode all samples
        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(_) => break,
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(_) => continue,
            };

            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;

            let mut sample_buf = SampleBuffer::<f32>::new(duration, spec);
            sample_buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(sample_buf.samples());
        }

        if samples.is_empty() {
            return Err(LoadError::Decode("no samples decoded".into()));
        }

        let samples = to_stereo(samples, channels);
        metadata.duration_secs = samples.len() as f64 / 2.0 / source_sample_rate as f64;

        // Resample to the engine rate if needed
        let (samples, final_sample_rate) = if source_sample_rate != self.target_sample_rate {
            (
                self.resample(&samples, source_sample_rate)?,
                self.target_sample_rate,
            )
        } else {
            (samples, source_sample_rate)
        };

        Ok(LoadedTrack {
            samples,
            sample_rate: final_sample_rate,
            metadata,
        })
    }

    /// Resample interleaved stereo audio to the target sample rate
    fn resample(&self, samples: &[f32], source_rate: u32) -> Result<Vec<f32>, LoadError> {
        use rubato::{FftFixedInOut, Resampler};

        const CHANNELS: usize = 2;
        let frames = samples.len() / CHANNELS;

        let mut resampler = FftFixedInOut::<f32>::new(
            source_rate as usize,
            self.target_sample_rate as usize,
            1024,
            CHANNELS,
        )
        .map_err(|e| LoadError::Decode(e.to_string()))?;

        // Deinterleave
        let deinterleaved: Vec<Vec<f32>> = (0..CHANNELS)
            .map(|ch| (0..frames).map(|f| samples[f * CHANNELS + ch]).collect())
            .collect();

        // Process in chunks
        let chunk_size = resampler.input_frames_next();
        let mut output: Vec<Vec<f32>> = vec![Vec::new(); CHANNELS];

        let mut pos = 0;
        while pos + chunk_size <= frames {
            let input_refs: Vec<&[f32]> = deinterleaved
                .iter()
                .map(|ch| &ch[pos..pos + chunk_size])
                .collect();

            let resampled = resampler
                .process(&input_refs, None)
                .map_err(|e| LoadError::Decode(e.to_string()))?;

            for (ch, data) in resampled.into_iter().enumerate() {
                output[ch].extend(data);
            }

            pos += chunk_size;
        }

        // Handle remaining samples (pad with zeros)
        if pos < frames {
            let remaining = frames - pos;
            let padded: Vec<Vec<f32>> = deinterleaved
                .iter()
                .map(|ch| {
                    let mut v = ch[pos..].to_vec();
                    v.resize(chunk_size, 0.0);
                    v
                })
                .collect();

            let input_refs: Vec<&[f32]> = padded.iter().map(|v| v.as_slice()).collect();

            if let Ok(resampled) = resampler.process(&input_refs, None) {
                for (ch, data) in resampled.into_iter().enumerate() {
                    let output_frames =
                        (remaining * self.target_sample_rate as usize) / source_rate as usize;
                    output[ch].extend(&data[..output_frames.min(data.len())]);
                }
            }
        }

        // Reinterleave
        let output_frames = output[0].len();
        let mut interleaved = Vec::with_capacity(output_frames * CHANNELS);
        for frame_idx in 0..output_frames {
            for channel in &output {
                interleaved.push(channel[frame_idx]);
            }
        }

        Ok(interleaved)
    }
}

/// Convert interleaved audio of any channel count to interleaved stereo
fn to_stereo(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    match channels {
        2 => samples,
        1 => {
            let mut stereo = Vec::with_capacity(samples.len() * 2);
            for s in samples {
                stereo.push(s);
                stereo.push(s);
            }
            stereo
        }
        n => {
            // Keep the first two channels, drop the rest
            let n = n as usize;
            let frames = samples.len() / n;
            let mut stereo = Vec::with_capacity(frames * 2);
            for f in 0..frames {
                stereo.push(samples[f * n]);
                stereo.push(samples[f * n + 1]);
            }
            stereo
        }
    }
}

/// Probe a file for title/artist tags without decoding the audio
///
/// Never fails: any error degrades to the filename-derived fallback.
pub(crate) fn probe_metadata(path: &Path) -> TrackMetadata {
    let fallback = fallback_metadata(path);

    let Ok(file) = std::fs::File::open(path) else {
        return fallback;
    };
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => {
            let mut format = probed.format;
            extract_metadata(&mut format, path)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "metadata probe failed");
            fallback
        }
    }
}

fn fallback_metadata(path: &Path) -> TrackMetadata {
    TrackMetadata {
        title: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown")
            .to_string(),
        artist: "Unknown Artist".to_string(),
        ..Default::default()
    }
}

/// Extract metadata from format reader, falling back to the filename
fn extract_metadata(
    format: &mut Box<dyn symphonia::core::formats::FormatReader>,
    path: &Path,
) -> TrackMetadata {
    let mut metadata = fallback_metadata(path);

    if let Some(meta) = format.metadata().current() {
        for tag in meta.tags() {
            match tag.std_key {
                Some(symphonia::core::meta::StandardTagKey::TrackTitle) => {
                    metadata.title = tag.value.to_string();
                }
                Some(symphonia::core::meta::StandardTagKey::Artist) => {
                    metadata.artist = tag.value.to_string();
                }
                _ => {}
            }
        }
    }

    metadata
}

/// Look for a cover image next to the audio file
///
/// Checks `<stem>.jpg`/`.png` first, then the usual folder-art names.
pub(crate) fn sidecar_art(path: &Path) -> Option<PathBuf> {
    let dir = path.parent()?;

    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        for ext in ["jpg", "jpeg", "png"] {
            let candidate = dir.join(format!("{stem}.{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    for name in ["cover.jpg", "cover.png", "folder.jpg", "folder.png"] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_metadata_uses_filename() {
        let meta = fallback_metadata(Path::new("/music/my song.mp3"));
        assert_eq!(meta.title, "my song");
        assert_eq!(meta.artist, "Unknown Artist");
    }

    #[test]
    fn test_probe_missing_file_degrades_to_fallback() {
        let meta = probe_metadata(Path::new("/definitely/not/here.flac"));
        assert_eq!(meta.title, "here");
        assert_eq!(meta.artist, "Unknown Artist");
    }

    #[test]
    fn test_mono_to_stereo_duplicates() {
        let stereo = to_stereo(vec![0.1, 0.2], 1);
        assert_eq!(stereo, vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn test_multichannel_keeps_first_two() {
        let stereo = to_stereo(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert_eq!(stereo, vec![1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let loader = TrackLoader::new();
        let err = loader.load(Path::new("/nope/missing.mp3")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
