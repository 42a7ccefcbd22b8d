//! Logic module container: a compiled boolean circuit's pin arrays, state
//! remap tables, and function-table blobs. The codec moves bytes only;
//! evaluating the circuit is external.

use log::trace;

use crate::blob::{self, BlobRange};
use crate::container::{CodecConfig, Container, FunctionTableForm};
use crate::decode::{u32_region, Reader};
use crate::encode::{Layout, Writer};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::magic;

/// Function-table payload of a module, in one of two mutually exclusive
/// shapes. Which shape a buffer holds cannot be told from the bytes; decode
/// follows [`CodecConfig::function_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionTable {
    /// One flat binary-decision-diagram blob per output bit. Each blob is a
    /// sequence of fixed-width node records whose interpretation is left to
    /// the evaluator.
    Bdd(Vec<Vec<u32>>),
    /// A single flat bit table covering every input combination.
    TruthTable(Vec<u8>),
}

impl Default for FunctionTable {
    fn default() -> Self {
        FunctionTable::Bdd(Vec::new())
    }
}

impl FunctionTable {
    fn blob_lengths(&self) -> Vec<usize> {
        match self {
            FunctionTable::Bdd(blobs) => blobs.iter().map(|b| b.len() * 4).collect(),
            FunctionTable::TruthTable(bits) => vec![bits.len()],
        }
    }
}

/// A compiled boolean circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub envelope: Envelope,
    /// Input pin data.
    pub input: Vec<u32>,
    /// Input state remapping table.
    pub input_remap: Vec<u8>,
    /// Output pin data.
    pub output: Vec<u32>,
    /// Output state remapping table.
    pub output_remap: Vec<u8>,
    /// The circuit's function table.
    pub function_table: FunctionTable,
}

impl Container for Module {
    const MAGIC: [u8; 4] = magic::MODULE;

    fn encode(&self) -> Vec<u8> {
        let blob_lengths = self.function_table.blob_lengths();
        // Layout pass: header fields, then the payload regions. Pin arrays
        // are word arrays and start aligned; the remap tables are byte
        // tables and pack in directly behind them.
        let mut layout = Layout::new();
        layout.field(self.envelope.encoded_len());
        layout.field(4 * 8); // input/output/remap pairs
        layout.field(4 + blob_lengths.len() * 8);
        layout.align();
        let input = BlobRange::new(layout.region(self.input.len() * 4), (self.input.len() * 4) as u32);
        layout.align();
        let output = BlobRange::new(layout.region(self.output.len() * 4), (self.output.len() * 4) as u32);
        let input_remap = BlobRange::new(
            layout.region(self.input_remap.len()),
            self.input_remap.len() as u32,
        );
        let output_remap = BlobRange::new(
            layout.region(self.output_remap.len()),
            self.output_remap.len() as u32,
        );
        layout.align();
        let table: Vec<BlobRange> = blob_lengths
            .iter()
            .map(|&len| BlobRange::new(layout.region(len), len as u32))
            .collect();

        // Write pass.
        let mut w = Writer::with_len(layout.total());
        self.envelope.write(&mut w, Self::MAGIC);
        input.write(&mut w);
        output.write(&mut w);
        input_remap.write(&mut w);
        output_remap.write(&mut w);
        blob::write_table(&mut w, &table);
        w.align();
        w.u32_slice(&self.input);
        w.align();
        w.u32_slice(&self.output);
        w.bytes(&self.input_remap);
        w.bytes(&self.output_remap);
        w.align();
        match &self.function_table {
            FunctionTable::Bdd(blobs) => {
                for words in blobs {
                    w.u32_slice(words);
                }
            }
            FunctionTable::TruthTable(bits) => w.bytes(bits),
        }
        w.finish()
    }

    fn decode_with(buf: &[u8], config: CodecConfig) -> Result<(Self, usize)> {
        let (envelope, header_len) = Envelope::decode(buf, Self::MAGIC)?;
        let mut r = Reader::new(buf);
        r.skip(header_len, "envelope")?;
        let input = BlobRange::read(&mut r, "input pair")?;
        let output = BlobRange::read(&mut r, "output pair")?;
        let input_remap = BlobRange::read(&mut r, "input remap pair")?;
        let output_remap = BlobRange::read(&mut r, "output remap pair")?;
        let table = blob::read_table(&mut r, "function table")?;
        trace!(
            "module decode: {} input words, {} function blobs",
            input.length / 4,
            table.len()
        );

        let function_table = match config.function_table {
            FunctionTableForm::Bdd => FunctionTable::Bdd(
                table
                    .iter()
                    .map(|range| Ok(u32_region(range.slice(buf)?)))
                    .collect::<Result<_>>()?,
            ),
            FunctionTableForm::TruthTable => {
                if table.len() != 1 {
                    return Err(Error::InconsistentBlobCount {
                        declared: table.len() as u32,
                        available: 1,
                    });
                }
                FunctionTable::TruthTable(table[0].slice(buf)?.to_vec())
            }
        };

        let consumed = [input, output, input_remap, output_remap]
            .iter()
            .chain(table.iter())
            .map(|range| range.offset as usize + range.length as usize)
            .fold(r.position(), usize::max);
        let module = Module {
            envelope,
            input: u32_region(input.slice(buf)?),
            input_remap: input_remap.slice(buf)?.to_vec(),
            output: u32_region(output.slice(buf)?),
            output_remap: output_remap.slice(buf)?.to_vec(),
            function_table,
        };
        Ok((module, consumed))
    }
}
