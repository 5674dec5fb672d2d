//! Byte model of the runtime `FieldPacker`.
//!
//! Executes a [`PackPlan`] against a little-endian buffer so the offsets a
//! generated class writes can be checked against the native layout without
//! a JVM.

use thiserror::Error;

use crate::pack::{PackPlan, PackStep};

/// Write past the end of the buffer.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
#[error("field packer overflow: {needed} bytes at position {position}, capacity {capacity}")]
pub struct PackOverflow {
    pub position: u32,
    pub needed: u32,
    pub capacity: u32,
}

/// Fixed-size little-endian write buffer.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FieldPacker {
    data: Vec<u8>,
    capacity: u32,
    pos: u32,
}

impl FieldPacker {
    pub fn new(len: u32) -> Self {
        FieldPacker {
            data: vec![0; len as usize],
            capacity: len,
            pos: 0,
        }
    }

    pub fn position(&self) -> u32 {
        self.pos
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn skip(&mut self, n: u32) -> Result<(), PackOverflow> {
        self.reserve(n)?;
        self.pos += n;
        Ok(())
    }

    /// Write the low `size` bytes of `bits`.
    pub fn add_bits(&mut self, size: u32, bits: u64) -> Result<(), PackOverflow> {
        self.reserve(size)?;
        let start = self.pos as usize;
        let end = start + size as usize;
        let bytes = bits.to_le_bytes();
        self.data[start..end].copy_from_slice(&bytes[..size as usize]);
        self.pos += size;
        Ok(())
    }

    /// Read `size` bytes at `offset`, or `None` if out of range.
    pub fn read_bits(&self, offset: u32, size: u32) -> Option<u64> {
        let start = offset as usize;
        let bytes = self.data.get(start..start.checked_add(size as usize)?)?;
        let mut buf = [0u8; 8];
        buf.get_mut(..bytes.len())?.copy_from_slice(bytes);
        Some(u64::from_le_bytes(buf))
    }

    fn reserve(&self, needed: u32) -> Result<(), PackOverflow> {
        if u64::from(self.pos) + u64::from(needed) > u64::from(self.capacity) {
            return Err(PackOverflow {
                position: self.pos,
                needed,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// Run `plan`, asking `value` for the bits of each lane.
///
/// `value` receives the leaf expression with loop counters replaced by the
/// current index (`v.pts[2].x`) and the lane number.
pub fn execute(
    plan: &PackPlan,
    packer: &mut FieldPacker,
    value: &mut dyn FnMut(&str, u32) -> u64,
) -> Result<(), PackOverflow> {
    run(plan.steps(), packer, value, &[])
}

fn run(
    steps: &[PackStep],
    packer: &mut FieldPacker,
    value: &mut dyn FnMut(&str, u32) -> u64,
    bound: &[(String, u32)],
) -> Result<(), PackOverflow> {
    for step in steps {
        match step {
            PackStep::Add { api, lanes, value: expr } => {
                let expr = substitute(expr, bound);
                for lane in 0..*lanes {
                    packer.add_bits(api.lane_size(), value(&expr, lane))?;
                }
            }
            PackStep::Skip(n) => packer.skip(*n)?,
            PackStep::Repeat {
                count,
                counter,
                body,
            } => {
                let mut inner = bound.to_vec();
                inner.push((counter.clone(), 0));
                for i in 0..*count {
                    if let Some(last) = inner.last_mut() {
                        last.1 = i;
                    }
                    run(body, packer, value, &inner)?;
                }
            }
        }
    }
    Ok(())
}

fn substitute(expr: &str, bound: &[(String, u32)]) -> String {
    bound.iter().fold(expr.to_owned(), |acc, (counter, i)| {
        acc.replace(&format!("[{counter}]"), &format!("[{i}]"))
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
