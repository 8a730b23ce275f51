//! RIFF `LIST/INFO` tag chunk.
//!
//! Tags are written as `INAM` (title), `ICRD` (date) and `IGNR` (genre).
//! Each value is NUL-terminated and padded to an even length.

use somnia_spec::MixTags;

const TITLE: &[u8; 4] = b"INAM";
const DATE: &[u8; 4] = b"ICRD";
const GENRE: &[u8; 4] = b"IGNR";

fn push_subchunk(out: &mut Vec<u8>, id: &[u8; 4], value: &str) {
    let mut text = value.as_bytes().to_vec();
    text.push(0);
    out.extend_from_slice(id);
    out.extend_from_slice(&(text.len() as u32).to_le_bytes());
    out.extend_from_slice(&text);
    if text.len() % 2 != 0 {
        out.push(0);
    }
}

/// Serializes `tags` as a complete `LIST` chunk, header included.
pub fn info_chunk(tags: &MixTags) -> Vec<u8> {
    let mut body = b"INFO".to_vec();
    push_subchunk(&mut body, TITLE, &tags.title);
    push_subchunk(&mut body, DATE, &tags.date);
    push_subchunk(&mut body, GENRE, &tags.genre);

    let mut chunk = Vec::with_capacity(8 + body.len());
    chunk.extend_from_slice(b"LIST");
    chunk.extend_from_slice(&(body.len() as u32).to_le_bytes());
    chunk.extend_from_slice(&body);
    chunk
}

fn read_u32(bytes: &[u8], pos: usize) -> Option<usize> {
    let b = bytes.get(pos..pos + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize)
}

/// Reads the tags back from a complete WAV file.
///
/// # Returns
/// `None` if the file has no `LIST/INFO` chunk. Missing tags are empty.
pub fn parse_info_tags(wav_data: &[u8]) -> Option<MixTags> {
    if wav_data.get(0..4)? != b"RIFF" || wav_data.get(8..12)? != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let id = &wav_data[pos..pos + 4];
        let size = read_u32(wav_data, pos + 4)?;
        let body = wav_data.get(pos + 8..pos + 8 + size)?;

        if id == b"LIST" && body.get(0..4) == Some(b"INFO".as_slice()) {
            let mut tags = MixTags {
                title: String::new(),
                date: String::new(),
                genre: String::new(),
            };
            let mut sub = 4;
            while sub + 8 <= body.len() {
                let sub_id = &body[sub..sub + 4];
                let sub_size = read_u32(body, sub + 4)?;
                let raw = body.get(sub + 8..sub + 8 + sub_size)?;
                let value = String::from_utf8_lossy(raw)
                    .trim_end_matches('\0')
                    .to_string();
                match sub_id {
                    b"INAM" => tags.title = value,
                    b"ICRD" => tags.date = value,
                    b"IGNR" => tags.genre = value,
                    _ => {}
                }
                sub += 8 + sub_size + sub_size % 2;
            }
            return Some(tags);
        }

        pos += 8 + size + size % 2;
    }

    None
}
