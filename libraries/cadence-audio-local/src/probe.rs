//! Symphonia-backed media reader
//!
//! Opens and probes a file up front so that unreadable media is reported
//! before a worker is spawned, then decodes packet by packet on demand.

use std::fs::File;
use std::path::Path;
use std::time::Duration;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::{Time, TimeBase};

use crate::error::{LocalAudioError, Result};

/// Outcome of decoding one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// A packet was decoded; carries the media time at its end
    Decoded(Duration),

    /// A corrupt packet or a packet of another track was skipped
    Skipped,

    /// End of stream
    End,
}

/// An opened, probed audio file
pub struct ProbedMedia {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    time_base: TimeBase,
    duration: Option<Duration>,
}

impl ProbedMedia {
    /// Open `path` and prepare a decoder for its default audio track
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
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
            .map_err(|e| LocalAudioError::Probe(e.to_string()))?;

        let format = probed.format;
        let track = format
            .default_track()
            .filter(|track| track.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(LocalAudioError::NoAudioTrack)?;

        let params = &track.codec_params;
        let sample_rate = params.sample_rate.unwrap_or(44100);
        let time_base = params.time_base.unwrap_or(TimeBase::new(1, sample_rate));
        let duration = match (params.n_frames, params.sample_rate) {
            (Some(frames), Some(rate)) if rate > 0 => {
                Some(Duration::from_secs_f64(frames as f64 / f64::from(rate)))
            }
            _ => None,
        };
        let track_id = track.id;

        let decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(|e| LocalAudioError::Codec(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            sample_rate,
            ?duration,
            "probed media"
        );

        Ok(Self {
            format,
            decoder,
            track_id,
            time_base,
            duration,
        })
    }

    /// Track duration, when the container reports a frame count
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Read and decode the next packet
    ///
    /// Decoded samples are discarded; only the timing is kept.
    pub fn decode_next(&mut self) -> Result<DecodeStep> {
        let packet = match self.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(DecodeStep::End);
            }
            Err(SymphoniaError::ResetRequired) => {
                self.decoder.reset();
                return Ok(DecodeStep::Skipped);
            }
            Err(e) => return Err(LocalAudioError::Decode(e.to_string())),
        };

        if packet.track_id() != self.track_id {
            return Ok(DecodeStep::Skipped);
        }

        match self.decoder.decode(&packet) {
            Ok(_) => {
                let end = self.time_base.calc_time(packet.ts() + packet.dur());
                Ok(DecodeStep::Decoded(to_duration(end)))
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                tracing::debug!(reason, "skipping corrupt packet");
                Ok(DecodeStep::Skipped)
            }
            Err(e) => Err(LocalAudioError::Decode(e.to_string())),
        }
    }

    /// Seek to `position`; returns the position actually reached
    pub fn seek(&mut self, position: Duration) -> Result<Duration> {
        let ts = self.time_base.calc_timestamp(position.into());
        let seeked = self
            .format
            .seek(
                SeekMode::Accurate,
                SeekTo::TimeStamp {
                    ts,
                    track_id: self.track_id,
                },
            )
            .map_err(|e| LocalAudioError::Seek(e.to_string()))?;

        self.decoder.reset();
        Ok(to_duration(self.time_base.calc_time(seeked.actual_ts)))
    }
}

fn to_duration(time: Time) -> Duration {
    Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac)
}
