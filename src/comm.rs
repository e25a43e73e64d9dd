use anyhow::{Context, Result};
use mpi::collective::SystemOperation;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

/// Message-passing substrate shared by both engines.
///
/// Participants are identified by ranks in [0, size); rank 0 is the
/// coordinator. Every collective must be reached by every participant in
/// the same order.
pub trait Comm {
    /// Rank of this participant.
    fn rank(&self) -> usize;

    /// Total number of participants.
    fn size(&self) -> usize;

    /// Block until every participant has arrived.
    fn barrier(&self);

    /// Tear down the whole group with a non-zero exit code.
    fn abort(&self, code: i32) -> !;

    /// Blocking broadcast of an i32 buffer from `root`.
    fn broadcast_i32s(&self, buf: &mut [i32], root: usize);

    /// Blocking broadcast of a byte buffer from `root`.
    fn broadcast_bytes(&self, buf: &mut [u8], root: usize);

    /// Post one non-blocking broadcast per block (rooted at the matching
    /// entry of `roots`, skipping index `skip`) and wait for all of them.
    ///
    /// When this returns, every participant holds identical bytes in every
    /// block except `blocks[skip]`, which is left untouched.
    fn broadcast_blocks(&self, blocks: &mut [Vec<i32>], roots: &[usize], skip: usize);

    /// Global sum of one i64 per participant; every rank gets the result.
    fn all_reduce_sum(&self, local: i64) -> i64;

    /// Point-to-point send of an i32 buffer to `dest`.
    fn send_i32s(&self, buf: &[i32], dest: usize);

    /// Point-to-point receive of an i32 buffer from `src`.
    fn recv_i32s(&self, buf: &mut [i32], src: usize);

    /// Broadcast a single i32 from `root` and return it.
    fn broadcast_scalar(&self, value: i32, root: usize) -> i32 {
        let mut v = value;
        self.broadcast_i32s(std::slice::from_mut(&mut v), root);
        v
    }
}

/// MPI-backed substrate.
///
/// Holds the MPI universe so that initialization happens once at program
/// entry and finalization runs on every exit path when the value drops.
pub struct MpiComm {
    world: SimpleCommunicator,
    _universe: Universe,
}

impl MpiComm {
    /// Initialize MPI and attach to the world communicator.
    pub fn init() -> Result<Self> {
        let universe = mpi::initialize().context("MPI initialization failed")?;
        let world = universe.world();
        Ok(Self {
            world,
            _universe: universe,
        })
    }
}

impl Comm for MpiComm {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn barrier(&self) {
        self.world.barrier();
    }

    fn abort(&self, code: i32) -> ! {
        self.world.abort(code)
    }

    fn broadcast_i32s(&self, buf: &mut [i32], root: usize) {
        self.world.process_at_rank(root as i32).broadcast_into(buf);
    }

    fn broadcast_bytes(&self, buf: &mut [u8], root: usize) {
        self.world.process_at_rank(root as i32).broadcast_into(buf);
    }

    fn broadcast_blocks(&self, blocks: &mut [Vec<i32>], roots: &[usize], skip: usize) {
        // Post every broadcast before waiting on any of them; the posting
        // order is ascending on every rank, as non-blocking collectives
        // require.
        mpi::request::scope(|scope| {
            let mut requests = Vec::with_capacity(blocks.len());
            for (idx, block) in blocks.iter_mut().enumerate() {
                if idx == skip {
                    continue;
                }
                let root = self.world.process_at_rank(roots[idx] as i32);
                requests.push(root.immediate_broadcast_into(scope, &mut block[..]));
            }
            for request in requests {
                request.wait();
            }
        });
    }

    fn all_reduce_sum(&self, local: i64) -> i64 {
        let mut global = 0i64;
        self.world
            .all_reduce_into(&local, &mut global, SystemOperation::sum());
        global
    }

    fn send_i32s(&self, buf: &[i32], dest: usize) {
        self.world.process_at_rank(dest as i32).send(buf);
    }

    fn recv_i32s(&self, buf: &mut [i32], src: usize) {
        self.world.process_at_rank(src as i32).receive_into(buf);
    }
}

/// Single-participant substrate.
///
/// Broadcasts and reductions degenerate to no-ops; point-to-point traffic
/// cannot occur because rank 0 is the only member. Used by the test suite
/// to drive both engines through their full code paths.
pub struct SoloComm;

impl Comm for SoloComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) {}

    fn abort(&self, code: i32) -> ! {
        std::process::exit(code)
    }

    fn broadcast_i32s(&self, _buf: &mut [i32], _root: usize) {}

    fn broadcast_bytes(&self, _buf: &mut [u8], _root: usize) {}

    fn broadcast_blocks(&self, _blocks: &mut [Vec<i32>], _roots: &[usize], _skip: usize) {}

    fn all_reduce_sum(&self, local: i64) -> i64 {
        local
    }

    fn send_i32s(&self, _buf: &[i32], _dest: usize) {
        unreachable!("point-to-point send in a single-participant group")
    }

    fn recv_i32s(&self, _buf: &mut [i32], _src: usize) {
        unreachable!("point-to-point receive in a single-participant group")
    }
}
