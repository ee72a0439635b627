//! Audio tag and stream properties

use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::error::Result;
use crate::extractors::{Extractor, extension_of};
use crate::record::Record;
use crate::value::Value;

const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".flac", ".ogg", ".wav", ".m4a"];

/// Accepts known audio extensions. Emits the common tag fields (`title`,
/// `artist`, `composer`, `album`, `genre`, `date`, `discnumber`) plus the
/// stream properties `duration` (seconds), `bitrate` (kbps), `samplerate`
/// and `channels`. Missing tags yield `Null`.
pub struct AudioExtractor;

impl Extractor for AudioExtractor {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn accepts(&self, path: &Path) -> bool {
        AUDIO_EXTENSIONS.contains(&extension_of(path).as_str())
    }

    fn extract(&self, path: &Path) -> Result<Record> {
        let tagged = Probe::open(path)?.read()?;
        let tag = tagged.primary_tag().or_else(|| tagged.first_tag());
        let props = tagged.properties();

        let mut record = Record::new();
        record.insert("title", tag_value(tag, &ItemKey::TrackTitle));
        record.insert("artist", tag_value(tag, &ItemKey::TrackArtist));
        record.insert("composer", tag_value(tag, &ItemKey::Composer));
        record.insert("album", tag_value(tag, &ItemKey::AlbumTitle));
        record.insert("genre", tag_value(tag, &ItemKey::Genre));
        record.insert("date", tag_value(tag, &ItemKey::RecordingDate));
        record.insert("discnumber", tag_value(tag, &ItemKey::DiscNumber));
        record.insert("duration", props.duration().as_secs_f64());
        record.insert("bitrate", props.audio_bitrate());
        record.insert("samplerate", props.sample_rate());
        record.insert(
            "channels",
            props.channels().map(|c| Value::Int(c as i64)).unwrap_or(Value::Null),
        );
        Ok(record)
    }
}

fn tag_value(tag: Option<&Tag>, key: &ItemKey) -> Value {
    tag.and_then(|t| t.get_string(key))
        .map(|s| Value::Text(s.to_string()))
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_audio_extensions_only() {
        assert!(AudioExtractor.accepts(Path::new("song.MP3")));
        assert!(AudioExtractor.accepts(Path::new("a/b/track.flac")));
        assert!(!AudioExtractor.accepts(Path::new("photo.jpg")));
        assert!(!AudioExtractor.accepts(Path::new("clip.aiff")));
    }

    #[test]
    fn test_garbage_audio_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("noise.mp3");
        std::fs::write(&file, "this is not an mpeg stream").unwrap();

        assert!(AudioExtractor.extract(&file).is_err());
    }
}
