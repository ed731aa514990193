// MIDI output from performances.
//
// Converts a `Performance` into a Standard MIDI File (SMF) for playback.
// Track 0 carries the tempo, track 1 the melody on channel 0 and track 2 the
// pseudoknot voice on channel 1. Both voices share one timeline, so a
// pseudoknot note sounds under the structure position that produced it.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1 (multi-track).

use std::path::Path;

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

use crate::error::SonifyError;
use crate::performer::{NoteEvent, Performance, TimedEvent};

const MELODY_CHANNEL: u8 = 0;
const KNOT_CHANNEL: u8 = 1;

/// Slowest tempo whose quarter-note length still fits the 24-bit tempo field.
const MIN_TEMPO_BPM: u16 = 4;

/// Convert a performance to MIDI and write it to a file.
pub fn write_midi(performance: &Performance, path: &Path) -> Result<(), SonifyError> {
    let buf = to_bytes(performance)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Encode a performance as SMF bytes.
pub fn to_bytes(performance: &Performance) -> Result<Vec<u8>, SonifyError> {
    let smf = performance_to_smf(performance);
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| SonifyError::Midi(e.to_string()))?;
    Ok(buf)
}

fn performance_to_smf(performance: &Performance) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(performance.ticks_per_quarter.clamp(1, 0x7FFF))),
    ));

    let mut tempo_track: Track<'static> = Vec::new();
    let tempo_microseconds = 60_000_000 / u32::from(performance.tempo_bpm.max(MIN_TEMPO_BPM));
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    smf.tracks.push(voice_track(
        b"Structure",
        MELODY_CHANNEL,
        &performance.melody,
        performance.total_ticks,
    ));
    smf.tracks.push(voice_track(
        b"Pseudoknots",
        KNOT_CHANNEL,
        &performance.knots,
        performance.total_ticks,
    ));
    smf
}

/// One voice as a track. Absolute ticks become deltas; the end-of-track
/// marker lands at `total_ticks` so every track spans the whole piece.
fn voice_track(
    name: &'static [u8],
    channel: u8,
    events: &[TimedEvent],
    total_ticks: u32,
) -> Track<'static> {
    let channel = u4::new(channel);
    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name)),
    });

    let mut last_event_tick: u32 = 0;
    for event in events {
        let delta = event.tick.saturating_sub(last_event_tick);
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel,
                message: midi_message(event.event),
            },
        });
        last_event_tick = last_event_tick.max(event.tick);
    }

    track.push(TrackEvent {
        delta: u28::new(total_ticks.saturating_sub(last_event_tick)),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}

fn midi_message(event: NoteEvent) -> MidiMessage {
    match event {
        NoteEvent::NoteOn { key, velocity } => MidiMessage::NoteOn {
            key: u7::new(key.min(127)),
            vel: u7::new(velocity.min(127)),
        },
        NoteEvent::NoteOff { key } => MidiMessage::NoteOff {
            key: u7::new(key.min(127)),
            vel: u7::new(0),
        },
        NoteEvent::Controller { controller, value } => MidiMessage::Controller {
            controller: u7::new(controller.min(127)),
            value: u7::new(value.min(127)),
        },
        NoteEvent::Aftertouch { pressure } => MidiMessage::ChannelAftertouch {
            vel: u7::new(pressure.min(127)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SonifyConfig;
    use crate::performer::sonify;
    use rnasonify_prng::RnaRng;

    fn performance(structure: &str) -> Performance {
        let distances = vec![64; structure.len()];
        sonify(
            structure,
            &distances,
            &SonifyConfig::default(),
            &mut RnaRng::new(4),
        )
        .unwrap()
    }

    #[test]
    fn smf_has_tempo_melody_and_knot_tracks() {
        let p = performance("::(<<_[[__>>,<<_]]_>>)::");
        let smf = performance_to_smf(&p);
        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 3);
        assert_eq!(
            smf.tracks[0][0].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))
        );
        // Name, one event per performance event, end of track.
        assert_eq!(smf.tracks[1].len(), p.melody.len() + 2);
        assert_eq!(smf.tracks[2].len(), p.knots.len() + 2);
    }

    #[test]
    fn tempo_below_four_bpm_is_raised_to_the_slowest_encodable() {
        let config = SonifyConfig {
            tempo_bpm: 1,
            ..SonifyConfig::default()
        };
        let p = sonify("(<_>)", &[0; 5], &config, &mut RnaRng::new(4)).unwrap();
        let smf = performance_to_smf(&p);
        assert_eq!(
            smf.tracks[0][0].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(15_000_000)))
        );
        assert!(Smf::parse(&to_bytes(&p).unwrap()).is_ok());
    }

    #[test]
    fn tracks_span_the_whole_piece_on_their_channels() {
        let p = performance("(<_[[_>,<_]]_>)");
        let smf = performance_to_smf(&p);
        for (track, channel) in [
            (&smf.tracks[1], MELODY_CHANNEL),
            (&smf.tracks[2], KNOT_CHANNEL),
        ] {
            let span: u32 = track.iter().map(|e| e.delta.as_int()).sum();
            assert_eq!(span, p.total_ticks);
            for event in track {
                if let TrackEventKind::Midi { channel: c, .. } = event.kind {
                    assert_eq!(c.as_int(), channel);
                }
            }
        }
    }

    #[test]
    fn distance_rides_on_controller_twenty() {
        let p = performance("(<_>)");
        let smf = performance_to_smf(&p);
        let controllers = smf.tracks[1]
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    TrackEventKind::Midi {
                        message: MidiMessage::Controller { controller, value },
                        ..
                    } if controller.as_int() == 20 && value.as_int() == 64
                )
            })
            .count();
        assert_eq!(controllers, 5);
    }

    #[test]
    fn encoded_file_parses_back() {
        let p = performance("::((<<-___->>))::");
        let bytes = to_bytes(&p).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
        let parsed = Smf::parse(&bytes).unwrap();
        assert_eq!(parsed.tracks.len(), 3);
        assert_eq!(parsed.tracks[1].len(), p.melody.len() + 2);
    }

    #[test]
    fn write_midi_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structure.mid");
        write_midi(&performance("(<___>)"), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"MThd"));
    }
}
