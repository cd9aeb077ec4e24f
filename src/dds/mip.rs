/// Location and size of one mip level inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    pub index: u32,
    /// Upload width, never below one texel.
    pub width: u32,
    /// Upload height, never below one texel.
    pub height: u32,
    /// Blocks per row as stored, including the padding of a partial block.
    pub blocks_wide: u32,
    pub blocks_high: u32,
    pub offset: usize,
    pub length: usize,
}

/// Walks a DXT mip chain level by level without touching the source buffer.
///
/// Lengths follow `ceil(max(4, w0 / 2^k) / 4) * ceil(max(4, h0 / 2^k) / 4) * block_size`
/// with the halved dimensions kept exact, so a sub-4-texel level still
/// occupies one block per axis. Offsets saturate instead of wrapping; a level
/// past the end of the buffer is caught by whoever slices it.
#[derive(Debug, Clone)]
pub struct MipChain {
    base_width: u32,
    base_height: u32,
    block_size: usize,
    level_count: u32,
    level: u32,
    offset: usize,
}

impl MipChain {
    pub fn new(
        base_width: u32,
        base_height: u32,
        level_count: u32,
        data_offset: usize,
        block_size: usize,
    ) -> Self {
        Self {
            base_width,
            base_height,
            block_size,
            level_count,
            level: 0,
            offset: data_offset,
        }
    }
}

impl Iterator for MipChain {
    type Item = MipLevel;

    fn next(&mut self) -> Option<Self::Item> {
        if self.level >= self.level_count {
            return None;
        }

        let index = self.level;
        let blocks_wide = block_count(self.base_width, index);
        let blocks_high = block_count(self.base_height, index);
        let length = (blocks_wide as usize)
            .saturating_mul(blocks_high as usize)
            .saturating_mul(self.block_size);

        let level = MipLevel {
            index,
            width: level_dimension(self.base_width, index),
            height: level_dimension(self.base_height, index),
            blocks_wide,
            blocks_high,
            offset: self.offset,
            length,
        };

        self.offset = self.offset.saturating_add(length);
        self.level += 1;

        Some(level)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.level_count - self.level) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MipChain {}

impl std::iter::FusedIterator for MipChain {}

/// `ceil(max(4, base / 2^level) / 4)`, which reduces to
/// `max(1, ceil(base / 2^(level + 2)))`.
fn block_count(base: u32, level: u32) -> u32 {
    let shift = u64::from(level) + 2;
    if shift >= 64 {
        return 1;
    }

    let divisor = 1u64 << shift;
    let blocks = (u64::from(base) + divisor - 1) / divisor;

    blocks.max(1) as u32
}

fn level_dimension(base: u32, level: u32) -> u32 {
    base.checked_shr(level).unwrap_or(0).max(1)
}
