// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The streamed scheduler: row-blocks queued round-robin on a small
//! fixed set of execution streams.
//!
//! This models an accelerator with its own memory.  The image has a
//! "device" twin, and for every block the driver queues three commands
//! on the block's stream: upload the host region to the device, compute
//! the block on the device, and download the device region back to the
//! host.  A stream runs its commands strictly in the order they were
//! queued, so blocks n, n+3, n+6, ... serialize on one stream while
//! blocks on different streams overlap freely.  When every command is
//! queued the driver closes the queues and joins the streams; that join
//! is the only point at which it blocks.
//!
//! Each stream is handed the host and device regions of its own blocks
//! and nothing else, so no byte of either buffer is reachable from two
//! streams.

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{debug, info};
use std::collections::HashMap;

use crate::blocks::{partition, Block};
use crate::error::{Error, Result};
use crate::escape::Evaluator;
use crate::flat::render_rows_parallel;
use crate::render::allocate;

/// One step queued on a stream, naming the block it applies to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    /// Copy the block's host region into device memory.
    Upload(usize),
    /// Evaluate every pixel of the block into device memory.
    Compute(usize),
    /// Copy the block's device region back to the host.
    Download(usize),
}

impl Command {
    /// The block this command applies to.
    pub fn block(&self) -> usize {
        match *self {
            Command::Upload(n) | Command::Compute(n) | Command::Download(n) => n,
        }
    }
}

struct Region<'a> {
    block: Block,
    host: &'a mut [u8],
    device: &'a mut [u8],
}

/// An execution stream: the regions it owns and the means to compute
/// them.
struct Stream<'a> {
    id: usize,
    evaluator: &'a Evaluator,
    threads: usize,
    regions: HashMap<usize, Region<'a>>,
}

impl<'a> Stream<'a> {
    fn new(id: usize, evaluator: &'a Evaluator, threads: usize) -> Self {
        Stream {
            id,
            evaluator,
            threads,
            regions: HashMap::new(),
        }
    }

    fn adopt(&mut self, region: Region<'a>) {
        self.regions.insert(region.block.index, region);
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let id = self.id;
        let region = match self.regions.get_mut(&command.block()) {
            Some(region) => region,
            None => {
                return Err(Error::ForeignBlock {
                    stream: id,
                    block: command.block(),
                })
            }
        };
        debug!("stream {}: {:?}", id, command);
        match command {
            Command::Upload(_) => region.device.copy_from_slice(&region.host[..]),
            Command::Compute(_) => render_rows_parallel(
                self.evaluator,
                region.block.rows.start,
                &mut region.device[..],
                self.threads,
            )?,
            Command::Download(_) => region.host.copy_from_slice(&region.device[..]),
        }
        Ok(())
    }

    /// Drain the queue until the driver closes it.  Returns the
    /// commands in the order they ran.
    fn run(mut self, queue: Receiver<Command>) -> Result<Vec<Command>> {
        let mut ran = Vec::new();
        for command in queue.iter() {
            self.execute(command)?;
            ran.push(command);
        }
        Ok(ran)
    }
}

/// What each stream did, indexed by stream id less one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StreamReport {
    /// The commands each stream ran, in the order it ran them.
    pub executed: Vec<Vec<Command>>,
}

/// Render the whole image into `buffer` as `blocks` row-blocks spread
/// over `streams` streams, sharing `threads` workers between them.
/// Returns once every stream has drained.
pub fn render_streamed(
    evaluator: &Evaluator,
    buffer: &mut [u8],
    blocks: usize,
    streams: usize,
    threads: usize,
) -> Result<StreamReport> {
    let width = evaluator.width();
    let parts = partition(evaluator.height(), blocks, streams)?;
    if buffer.len() != width * evaluator.height() {
        return Err(Error::Dimensions {
            width,
            height: buffer.len() / width,
        });
    }
    let block_size = parts[0].size(width);
    let per_stream = (threads / streams).max(1);
    info!(
        "{} blocks of {} rows on {} streams, {} threads each",
        blocks,
        block_size / width,
        streams,
        per_stream
    );

    let mut device = allocate(buffer.len())?;

    let mut pool: Vec<Stream> = (1..=streams)
        .map(|id| Stream::new(id, evaluator, per_stream))
        .collect();
    for ((block, host), device) in parts
        .iter()
        .cloned()
        .zip(buffer.chunks_mut(block_size))
        .zip(device.chunks_mut(block_size))
    {
        pool[block.stream - 1].adopt(Region {
            block,
            host,
            device,
        });
    }

    crossbeam::scope(|spawner| {
        let mut queues: Vec<Sender<Command>> = Vec::with_capacity(streams);
        let mut handles = Vec::with_capacity(streams);
        for stream in pool {
            let (tx, rx) = unbounded();
            queues.push(tx);
            handles.push(spawner.spawn(move |_| stream.run(rx)));
        }

        let mut issued = Ok(());
        'issue: for block in &parts {
            let queue = &queues[block.stream - 1];
            for &command in &[
                Command::Upload(block.index),
                Command::Compute(block.index),
                Command::Download(block.index),
            ] {
                if queue.send(command).is_err() {
                    issued = Err(Error::StreamClosed(block.stream));
                    break 'issue;
                }
            }
        }

        // Closing the queues lets each stream finish what it has and exit.
        drop(queues);
        let mut report = StreamReport::default();
        let mut first_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(ran)) => report.executed.push(ran),
                Ok(Err(err)) => {
                    first_error.get_or_insert(err);
                }
                Err(_) => {
                    first_error.get_or_insert(Error::WorkerPanicked);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => issued.map(|_| report),
        }
    })
    .map_err(|_| Error::WorkerPanicked)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::flat::render_flat;

    fn evaluator(width: usize, height: usize) -> Evaluator {
        Evaluator::new(&Config::with_size(width, height).unwrap()).unwrap()
    }

    #[test]
    fn streamed_matches_flat() {
        let ev = evaluator(64, 48);
        let mut flat = vec![0u8; 64 * 48];
        render_flat(&ev, &mut flat, 4).unwrap();
        let cases = [(8, 3, 4), (1, 3, 1), (48, 3, 6), (6, 1, 2), (4, 5, 8)];
        for &(blocks, streams, threads) in &cases {
            let mut streamed = vec![0x55u8; 64 * 48];
            render_streamed(&ev, &mut streamed, blocks, streams, threads).unwrap();
            assert_eq!(streamed, flat, "{} blocks on {} streams", blocks, streams);
        }
    }

    #[test]
    fn each_stream_runs_its_blocks_in_program_order() {
        let ev = evaluator(16, 8);
        let mut buffer = vec![0u8; 16 * 8];
        let report = render_streamed(&ev, &mut buffer, 8, 3, 3).unwrap();
        assert_eq!(report.executed.len(), 3);
        let expect = |blocks: &[usize]| -> Vec<Command> {
            blocks
                .iter()
                .flat_map(|&n| {
                    vec![Command::Upload(n), Command::Compute(n), Command::Download(n)]
                })
                .collect()
        };
        assert_eq!(report.executed[0], expect(&[0, 3, 6]));
        assert_eq!(report.executed[1], expect(&[1, 4, 7]));
        assert_eq!(report.executed[2], expect(&[2, 5]));
    }

    #[test]
    fn uneven_blocks_are_refused_before_any_work() {
        let ev = evaluator(16, 10);
        let mut buffer = vec![7u8; 16 * 10];
        assert!(render_streamed(&ev, &mut buffer, 3, 3, 2).is_err());
        assert!(buffer.iter().all(|&b| b == 7));
    }

    #[test]
    fn wrong_buffer_size_is_refused() {
        let ev = evaluator(16, 8);
        let mut buffer = vec![0u8; 16 * 7];
        assert!(render_streamed(&ev, &mut buffer, 4, 3, 2).is_err());
    }

    #[test]
    fn streams_refuse_foreign_blocks() {
        let ev = evaluator(4, 2);
        let mut stream = Stream::new(1, &ev, 1);
        assert!(stream.execute(Command::Compute(0)).is_err());
    }

    #[test]
    fn upload_compute_download_moves_data_through_the_device() {
        let ev = evaluator(4, 2);
        let mut host = vec![9u8; 8];
        let mut device = vec![0u8; 8];
        let block = partition(2, 1, 1).unwrap().remove(0);
        {
            let mut stream = Stream::new(1, &ev, 1);
            stream.adopt(Region {
                block,
                host: &mut host,
                device: &mut device,
            });
            stream.execute(Command::Upload(0)).unwrap();
            assert!(stream.regions[&0].device.iter().all(|&b| b == 9));
            stream.execute(Command::Compute(0)).unwrap();
            assert!(stream.regions[&0].host.iter().all(|&b| b == 9));
            stream.execute(Command::Download(0)).unwrap();
        }
        let mut expected = vec![0u8; 8];
        render_flat(&ev, &mut expected, 1).unwrap();
        assert_eq!(host, expected);
    }
}
