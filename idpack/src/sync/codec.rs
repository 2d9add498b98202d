//! Encoding and decoding of `{id -> last synced at}` mappings.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::compressor::{Compressor, LzString};
use super::id::{parse_canonical_u64, IdKind, SyncId};
use super::Error;

/// Field delimiter of a sync string.
const FIELD_SEPARATOR: char = ',';

/// Delimiter between integer ids inside one identifier group.
const ID_SEPARATOR: char = ',';

/// Length of a UUID in its dash-less hex form.
const SIMPLE_UUID_LEN: usize = 32;

/// Encodes and decodes sync strings through a [`Compressor`].
#[derive(Debug, Clone, Default)]
pub struct SyncCodec<C = LzString> {
    compressor: C,
}

impl SyncCodec {
    /// Creates a codec backed by LZ-String.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Compressor> SyncCodec<C> {
    /// Creates a codec backed by `compressor`.
    pub fn with_compressor(compressor: C) -> Self {
        Self { compressor }
    }

    /// Encodes `synced_at` into a sync string. The empty mapping encodes as
    /// `""`.
    ///
    /// Identifiers sharing a timestamp form one group. Integer and UUID ids
    /// never share a group, so mappings mixing both kinds survive a round
    /// trip.
    pub fn encode(&self, synced_at: &BTreeMap<SyncId, i64>) -> String {
        let Some(min) = synced_at.values().copied().min() else {
            return String::new();
        };

        let mut groups: BTreeMap<(i64, IdKind), Vec<SyncId>> = BTreeMap::new();
        for (id, timestamp) in synced_at {
            groups.entry((*timestamp, id.kind())).or_default().push(*id);
        }

        let mut fields = Vec::with_capacity(1 + 2 * groups.len());
        fields.push(self.compressor.compress(&min.to_string()));
        for ((timestamp, _), ids) in &groups {
            fields.push(self.compressor.compress(&join_ids(ids)));
            fields.push(self.compressor.compress(&timestamp.abs_diff(min).to_string()));
        }

        tracing::trace!(ids = synced_at.len(), groups = groups.len(), "encoded sync string");
        fields.join(&FIELD_SEPARATOR.to_string())
    }

    /// Decodes a sync string, shifting every timestamp by `base_timestamp`.
    ///
    /// Never fails: a corrupted sync string is logged and yields an empty
    /// mapping.
    pub fn decode(&self, sync_str: &str, base_timestamp: i64) -> BTreeMap<SyncId, i64> {
        match self.try_decode(sync_str, base_timestamp) {
            Ok(synced_at) => synced_at,
            Err(error) => {
                tracing::debug!(%error, sync_str, "discarding corrupted sync string");
                BTreeMap::new()
            }
        }
    }

    /// Decodes a sync string, reporting why corrupted input was rejected.
    ///
    /// When an identifier appears in several groups it keeps the latest of
    /// their timestamps.
    pub fn try_decode(
        &self,
        sync_str: &str,
        base_timestamp: i64,
    ) -> Result<BTreeMap<SyncId, i64>, Error> {
        let mut synced_at = BTreeMap::new();
        if sync_str.is_empty() {
            return Ok(synced_at);
        }

        let fields: Vec<&str> = sync_str.split(FIELD_SEPARATOR).collect();
        if let Some(position) = fields.iter().position(|field| field.is_empty()) {
            return Err(Error::MissingField(position));
        }

        let (min_field, groups) = fields.split_at(1);
        if groups.len() % 2 != 0 {
            return Err(Error::UnpairedField(fields.len()));
        }
        let min = parse_timestamp(&self.compressor.decompress(min_field[0])?)?;

        for pair in groups.chunks_exact(2) {
            let ids = parse_ids(&self.compressor.decompress(pair[0])?)?;
            let delta = parse_delta(&self.compressor.decompress(pair[1])?)?;

            let timestamp = i128::from(min) + i128::from(delta) + i128::from(base_timestamp);
            let timestamp =
                i64::try_from(timestamp).map_err(|_| Error::TimestampOverflow(timestamp))?;

            for id in ids {
                synced_at
                    .entry(id)
                    .and_modify(|current: &mut i64| *current = (*current).max(timestamp))
                    .or_insert(timestamp);
            }
        }

        Ok(synced_at)
    }
}

/// Renders one identifier group. The ids of a group all share one kind.
fn join_ids(ids: &[SyncId]) -> String {
    let mut joined = String::new();
    for id in ids {
        match id {
            SyncId::Int(value) => {
                if !joined.is_empty() {
                    joined.push(ID_SEPARATOR);
                }
                joined.push_str(&value.to_string());
            }
            SyncId::Uuid(value) => joined.push_str(&value.simple().to_string()),
        }
    }
    joined
}

/// Parses one identifier group. A group is integers if every
/// comma-separated part is canonical decimal, otherwise it must be a
/// sequence of dash-less UUIDs.
fn parse_ids(group: &str) -> Result<Vec<SyncId>, Error> {
    let invalid = || Error::InvalidIdentifier(group.to_string());

    let ints: Option<Vec<SyncId>> = group
        .split(ID_SEPARATOR)
        .map(|part| parse_canonical_u64(part).map(SyncId::Int))
        .collect();
    if let Some(ints) = ints {
        return Ok(ints);
    }

    if group.is_empty() || !group.is_ascii() || group.len() % SIMPLE_UUID_LEN != 0 {
        return Err(invalid());
    }

    group
        .as_bytes()
        .chunks(SIMPLE_UUID_LEN)
        .map(|chunk| {
            let text = std::str::from_utf8(chunk).map_err(|_| invalid())?;
            Uuid::try_parse(text).map(SyncId::Uuid).map_err(|_| invalid())
        })
        .collect()
}

fn parse_timestamp(text: &str) -> Result<i64, Error> {
    text.parse()
        .map_err(|_| Error::InvalidTimestamp(text.to_string()))
}

/// Deltas are measured from the minimum, so they are never negative but
/// may exceed `i64::MAX`.
fn parse_delta(text: &str) -> Result<u64, Error> {
    text.parse()
        .map_err(|_| Error::InvalidTimestamp(text.to_string()))
}
