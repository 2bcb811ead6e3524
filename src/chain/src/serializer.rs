/*
  Copyright (C) 2018-2020 The Indigo Core Developers.
  This file is part of the Indigo Core Library.

  The Indigo Core Library is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  The Indigo Core Library is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with the Indigo Core Library. If not, see <http://www.gnu.org/licenses/>.
*/

use crate::light_chain::LightChain;
use crossbeam_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce(&mut LightChain) + Send + 'static>;

/// Single-writer dispatch queue for chain mutations.
///
/// Jobs run strictly one at a time in submission order on a dedicated
/// worker thread, holding the chain's write lock for the duration of
/// one job. Submitted jobs are never cancelled; dropping the
/// serializer drains the queue and joins the worker.
pub(crate) struct Serializer {
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl Serializer {
    pub fn new(chain: Arc<RwLock<LightChain>>) -> Serializer {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();

        let worker = std::thread::Builder::new()
            .name("chain-serializer".to_string())
            .spawn(move || {
                for job in receiver.iter() {
                    let mut chain = chain.write();

                    // An invariant violation aborts the one operation,
                    // not the queue; the submitter sees the dropped
                    // completion.
                    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        job(&mut chain)
                    }));

                    if result.is_err() {
                        error!("A chain mutation panicked and was aborted");
                    }
                }
            })
            .expect("Failed to spawn the chain serializer");

        Serializer {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Enqueues a mutation and blocks the caller until the worker has
    /// executed it, completing with the job's result.
    pub fn execute<F, R>(&self, fun: F) -> R
    where
        F: FnOnce(&mut LightChain) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(1);

        let job: Job = Box::new(move |chain| {
            let _ = sender.send(fun(chain));
        });

        self.sender
            .as_ref()
            .expect("The chain serializer is shut down")
            .send(job)
            .expect("The chain serializer is gone");

        receiver
            .recv()
            .expect("The chain serializer dropped a job")
    }
}

impl Drop for Serializer {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        drop(self.sender.take());

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn jobs_run_in_submission_order() {
        let chain = Arc::new(RwLock::new(LightChain::new()));
        let serializer = Serializer::new(chain);

        let mut seen = Vec::new();

        for i in 0..16 {
            seen.push(serializer.execute(move |_| i));
        }

        assert_eq!(seen, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn concurrent_submissions_are_serialized() {
        let chain = Arc::new(RwLock::new(LightChain::new()));
        let serializer = Arc::new(Serializer::new(chain.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let serializer = serializer.clone();
                thread::spawn(move || {
                    for _ in 0..32 {
                        // Each job observes the store while no other
                        // job is running; the entry count is stable
                        // within a job.
                        serializer.execute(|chain| {
                            let before = chain.store.len();
                            let after = chain.store.len();
                            assert_eq!(before, after);
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(chain.read().store.len(), 1);
    }
}
