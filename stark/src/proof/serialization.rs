use quartz_crypto::hash::{Commitment, DIGEST_SIZE};
use quartz_crypto::merkle_tree::proof::BatchMerkleProof;
use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::{IsFFTField, IsPrimeField};
use quartz_math::traits::ByteConversion;

use crate::errors::SerializationError;
use crate::fri::proof::{FriComponent, FriProof};
use crate::proof::stark::StarkProof;

// Canonical binary proof encoding.
//
// Length prefixes are one byte; an array count of 0 means 256. Matrix
// columns carry a packed header `length << 1 | type_bit`, where the type
// bit marks a first entry of leaf width rather than digest width, so
// columns cannot exceed 127 entries.

const MAX_ARRAY_LENGTH: usize = 256;
const MAX_COLUMN_LENGTH: usize = 127;

fn write_length_prefix(out: &mut Vec<u8>, length: usize) -> Result<(), SerializationError> {
    if length == 0 || length > MAX_ARRAY_LENGTH {
        return Err(SerializationError::ArrayTooLong(length));
    }
    out.push((length % MAX_ARRAY_LENGTH) as u8);
    Ok(())
}

fn write_array(
    out: &mut Vec<u8>,
    rows: &[Vec<u8>],
    row_size: usize,
) -> Result<(), SerializationError> {
    write_length_prefix(out, rows.len())?;
    for row in rows {
        if row.len() != row_size {
            return Err(SerializationError::InvalidLeafSize {
                expected: row_size,
                got: row.len(),
            });
        }
        out.extend_from_slice(row);
    }
    Ok(())
}

fn write_matrix(
    out: &mut Vec<u8>,
    columns: &[Vec<Vec<u8>>],
    leaf_size: usize,
) -> Result<(), SerializationError> {
    if columns.is_empty() || columns.len() > MAX_ARRAY_LENGTH {
        return Err(SerializationError::TooManyColumns(columns.len()));
    }
    out.push((columns.len() % MAX_ARRAY_LENGTH) as u8);

    for column in columns {
        if column.len() > MAX_COLUMN_LENGTH {
            return Err(SerializationError::ColumnTooLong(column.len()));
        }
        let type_bit = match column.first() {
            Some(first) if first.len() == leaf_size => 1u8,
            _ => 0u8,
        };
        out.push(((column.len() as u8) << 1) | type_bit);
        for (i, entry) in column.iter().enumerate() {
            let expected = if i == 0 && type_bit == 1 {
                leaf_size
            } else {
                DIGEST_SIZE
            };
            if entry.len() != expected {
                return Err(SerializationError::InvalidLeafSize {
                    expected,
                    got: entry.len(),
                });
            }
            out.extend_from_slice(entry);
        }
    }
    Ok(())
}

fn write_batch_proof(
    out: &mut Vec<u8>,
    proof: &BatchMerkleProof,
    leaf_size: usize,
) -> Result<(), SerializationError> {
    write_array(out, &proof.values, leaf_size)?;
    write_matrix(out, &proof.nodes, leaf_size)?;
    out.push(proof.depth);
    Ok(())
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn read_u8(&mut self) -> Result<u8, SerializationError> {
        let byte = *self
            .bytes
            .get(self.position)
            .ok_or(SerializationError::UnexpectedEnd)?;
        self.position += 1;
        Ok(byte)
    }

    fn read_exact(&mut self, count: usize) -> Result<&'a [u8], SerializationError> {
        if self.position + count > self.bytes.len() {
            return Err(SerializationError::UnexpectedEnd);
        }
        let slice = &self.bytes[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn read_commitment(&mut self) -> Result<Commitment, SerializationError> {
        Ok(self.read_exact(DIGEST_SIZE)?.try_into().unwrap())
    }

    fn is_done(&self) -> bool {
        self.position == self.bytes.len()
    }
}

fn read_array(reader: &mut ByteReader, row_size: usize) -> Result<Vec<Vec<u8>>, SerializationError> {
    let count = match reader.read_u8()? {
        0 => MAX_ARRAY_LENGTH,
        n => n as usize,
    };
    (0..count)
        .map(|_| Ok(reader.read_exact(row_size)?.to_vec()))
        .collect()
}

fn read_matrix(
    reader: &mut ByteReader,
    leaf_size: usize,
) -> Result<Vec<Vec<Vec<u8>>>, SerializationError> {
    let count = match reader.read_u8()? {
        0 => MAX_ARRAY_LENGTH,
        n => n as usize,
    };
    (0..count)
        .map(|_| {
            let header = reader.read_u8()?;
            let length = (header >> 1) as usize;
            let type_bit = header & 1;
            (0..length)
                .map(|i| {
                    let size = if i == 0 && type_bit == 1 {
                        leaf_size
                    } else {
                        DIGEST_SIZE
                    };
                    Ok(reader.read_exact(size)?.to_vec())
                })
                .collect()
        })
        .collect()
}

fn read_batch_proof(
    reader: &mut ByteReader,
    leaf_size: usize,
) -> Result<BatchMerkleProof, SerializationError> {
    let values = read_array(reader, leaf_size)?;
    let nodes = read_matrix(reader, leaf_size)?;
    let depth = reader.read_u8()?;
    Ok(BatchMerkleProof {
        values,
        nodes,
        depth,
    })
}

/// Serializes a proof into its canonical byte encoding.
pub fn serialize_proof<F: IsFFTField + IsPrimeField>(
    proof: &StarkProof<F>,
    num_registers: usize,
) -> Result<Vec<u8>, SerializationError>
where
    FieldElement<F>: ByteConversion,
{
    let element_size = F::ELEMENT_SIZE;
    let ev_leaf_size = num_registers * element_size;
    let fri_leaf_size = 4 * element_size;

    let mut out = Vec::new();
    out.extend_from_slice(&proof.ev_root);
    write_batch_proof(&mut out, &proof.ev_proof, ev_leaf_size)?;

    out.extend_from_slice(&proof.ld_proof.lc_root);
    write_batch_proof(&mut out, &proof.ld_proof.lc_proof, fri_leaf_size)?;
    if proof.ld_proof.components.len() > u8::MAX as usize {
        return Err(SerializationError::ArrayTooLong(
            proof.ld_proof.components.len(),
        ));
    }
    out.push(proof.ld_proof.components.len() as u8);
    for component in proof.ld_proof.components.iter() {
        out.extend_from_slice(&component.column_root);
        write_batch_proof(&mut out, &component.column_proof, fri_leaf_size)?;
        write_batch_proof(&mut out, &component.poly_proof, fri_leaf_size)?;
    }

    write_length_prefix(&mut out, proof.ld_proof.remainder.len())?;
    for element in proof.ld_proof.remainder.iter() {
        out.extend_from_slice(&element.to_bytes_le());
    }

    if proof.input_shapes.len() > u8::MAX as usize {
        return Err(SerializationError::ArrayTooLong(proof.input_shapes.len()));
    }
    out.push(proof.input_shapes.len() as u8);
    for shape in proof.input_shapes.iter() {
        out.extend_from_slice(&shape.to_le_bytes());
    }

    Ok(out)
}

/// Parses a canonical proof encoding. `num_registers` is the total width
/// of an evaluation-tree leaf in field elements (trace plus secret
/// registers).
pub fn deserialize_proof<F: IsFFTField + IsPrimeField>(
    bytes: &[u8],
    num_registers: usize,
) -> Result<StarkProof<F>, SerializationError>
where
    FieldElement<F>: ByteConversion,
{
    let element_size = F::ELEMENT_SIZE;
    let ev_leaf_size = num_registers * element_size;
    let fri_leaf_size = 4 * element_size;

    let mut reader = ByteReader::new(bytes);

    let ev_root = reader.read_commitment()?;
    let ev_proof = read_batch_proof(&mut reader, ev_leaf_size)?;

    let lc_root = reader.read_commitment()?;
    let lc_proof = read_batch_proof(&mut reader, fri_leaf_size)?;
    let component_count = reader.read_u8()? as usize;
    let components = (0..component_count)
        .map(|_| {
            let column_root = reader.read_commitment()?;
            let column_proof = read_batch_proof(&mut reader, fri_leaf_size)?;
            let poly_proof = read_batch_proof(&mut reader, fri_leaf_size)?;
            Ok(FriComponent {
                column_root,
                column_proof,
                poly_proof,
            })
        })
        .collect::<Result<Vec<_>, SerializationError>>()?;

    let remainder_count = match reader.read_u8()? {
        0 => MAX_ARRAY_LENGTH,
        n => n as usize,
    };
    let remainder = (0..remainder_count)
        .map(|_| {
            FieldElement::from_bytes_le(reader.read_exact(element_size)?)
                .map_err(|_| SerializationError::InvalidElement)
        })
        .collect::<Result<Vec<_>, SerializationError>>()?;

    let shape_count = reader.read_u8()? as usize;
    let input_shapes = (0..shape_count)
        .map(|_| {
            Ok(u32::from_le_bytes(
                reader.read_exact(4)?.try_into().unwrap(),
            ))
        })
        .collect::<Result<Vec<_>, SerializationError>>()?;

    if !reader.is_done() {
        return Err(SerializationError::TrailingBytes);
    }

    Ok(StarkProof {
        ev_root,
        ev_proof,
        ld_proof: FriProof {
            lc_root,
            lc_proof,
            components,
            remainder,
        },
        input_shapes,
    })
}
