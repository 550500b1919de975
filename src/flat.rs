//! The flat scheduler: one pool of workers over the whole grid.
//!
//! Rows are handed out from a shared queue to a fixed number of scoped
//! threads.  Each row is a disjoint slice of the buffer, so the only
//! thing the workers ever contend on is the queue itself, and the
//! finished image does not depend on which worker got which row.

use log::{debug, trace};
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::escape::Evaluator;

type RowQueue<'a> = Mutex<Enumerate<ChunksMut<'a, u8>>>;

/// Render the whole image into `buffer` with `threads` workers.  Does
/// not return until every pixel has been written.
pub fn render_flat(evaluator: &Evaluator, buffer: &mut [u8], threads: usize) -> Result<()> {
    render_rows_parallel(evaluator, 0, buffer, threads)
}

/// Render the rows held in `rows`, the first of which is image row
/// `top`, with `threads` workers.
pub fn render_rows_parallel(
    evaluator: &Evaluator,
    top: usize,
    rows: &mut [u8],
    threads: usize,
) -> Result<()> {
    let width = evaluator.width();
    if rows.len() % width != 0 {
        return Err(Error::Dimensions {
            width,
            height: rows.len() / width,
        });
    }
    let threads = threads.max(1).min(rows.len() / width);
    debug!(
        "rendering {} rows from row {} on {} threads",
        rows.len() / width,
        top,
        threads
    );
    if threads <= 1 {
        evaluator.render_rows(top, rows);
        return Ok(());
    }

    let queue: RowQueue = Mutex::new(rows.chunks_mut(width).enumerate());
    crossbeam::scope(|spawner| {
        for worker in 0..threads {
            let queue = &queue;
            spawner.spawn(move |_| {
                let mut done = 0;
                loop {
                    let next = match queue.lock() {
                        Ok(mut rows) => rows.next(),
                        Err(_) => None,
                    };
                    match next {
                        Some((y, row)) => {
                            evaluator.render_rows(top + y, row);
                            done += 1;
                        }
                        None => break,
                    }
                }
                trace!("worker {} rendered {} rows", worker, done);
            });
        }
    })
    .map_err(|_| Error::WorkerPanicked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::planes::Pixel;

    fn serial(ev: &Evaluator) -> Vec<u8> {
        let mut out = Vec::with_capacity(ev.width() * ev.height());
        for y in 0..ev.height() {
            for x in 0..ev.width() {
                out.push(ev.evaluate(Pixel(x, y)));
            }
        }
        out
    }

    #[test]
    fn every_thread_count_gives_the_same_image() {
        let ev = Evaluator::new(&Config::with_size(40, 30).unwrap()).unwrap();
        let expected = serial(&ev);
        for &threads in &[0, 1, 2, 3, 7, 64] {
            let mut buffer = vec![0xAAu8; 40 * 30];
            render_flat(&ev, &mut buffer, threads).unwrap();
            assert_eq!(buffer, expected, "threads = {}", threads);
        }
    }

    #[test]
    fn partial_rows_are_rejected() {
        let ev = Evaluator::new(&Config::with_size(10, 10).unwrap()).unwrap();
        let mut buffer = vec![0u8; 15];
        assert!(render_rows_parallel(&ev, 0, &mut buffer, 2).is_err());
    }

    #[test]
    fn offset_rows_land_where_they_belong() {
        let ev = Evaluator::new(&Config::with_size(20, 12).unwrap()).unwrap();
        let whole = serial(&ev);
        let mut part = vec![0u8; 20 * 4];
        render_rows_parallel(&ev, 6, &mut part, 3).unwrap();
        assert_eq!(&part[..], &whole[6 * 20..10 * 20]);
    }
}
