//! Job scheduler lane partitioning
//!
//! The job scheduler runs one worker per lane. Each lane carries a [`JobType`]
//! mask describing what work it may pick up. GPU-resource submission and bulk
//! resource loading get lanes of their own when the hardware and the renderer
//! allow it; otherwise they share a single lane with general work.

use bitflags::bitflags;

use super::SystemError;

/// Hard upper bound on job scheduler lanes
pub const MAX_JOB_LANES: usize = 15;

bitflags! {
    /// Categories of work a job lane may execute
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct JobType: u32 {
        /// General-purpose work with no ordering requirements
        const GENERAL = 1 << 1;
        /// Loading resources from disk
        const RESOURCE_LOAD = 1 << 2;
        /// Work that touches GPU resources (uploads, resource creation)
        const GPU_RESOURCE = 1 << 3;
    }
}

/// Job scheduler configuration: one type mask per worker lane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSystemConfig {
    /// Type mask of each lane; the length is the lane count
    pub type_masks: Vec<JobType>,
}

impl JobSystemConfig {
    /// Number of worker lanes
    pub fn lane_count(&self) -> usize {
        self.type_masks.len()
    }

    /// Lanes that may run jobs of the given type
    pub fn lanes_for(&self, job_type: JobType) -> impl Iterator<Item = usize> + '_ {
        self.type_masks
            .iter()
            .enumerate()
            .filter(move |(_, mask)| mask.intersects(job_type))
            .map(|(lane, _)| lane)
    }
}

/// Split the host's hardware threads into job lanes
///
/// One thread is reserved for the main thread. The remainder, capped at
/// `max_lanes`, becomes the lane count:
///
/// - a single lane, or a renderer that cannot take multithreaded submission,
///   puts GPU-resource and resource-load work on lane 0 next to general work
/// - two lanes split them: lane 0 takes GPU-resource, lane 1 resource-load,
///   both keep general work
/// - three or more lanes dedicate lane 0 to GPU-resource and lane 1 to
///   resource-load exclusively, the rest stay general
pub fn partition_job_lanes(
    hardware_thread_count: usize,
    renderer_multithreaded: bool,
    max_lanes: usize,
) -> Result<JobSystemConfig, SystemError> {
    let available = hardware_thread_count.saturating_sub(1);
    if available < 1 {
        log::error!(
            "Platform reported processor count (minus one for main thread) as {}. Need at least one additional thread for the job system.",
            available
        );
        return Err(SystemError::InsufficientThreads {
            hardware_threads: hardware_thread_count,
        });
    }
    log::trace!("Available threads: {}", available);

    let cap = max_lanes.clamp(1, MAX_JOB_LANES);
    let lane_count = if available > cap {
        log::trace!(
            "Available threads on the system is {}, but will be capped at {}.",
            available,
            cap
        );
        cap
    } else {
        available
    };

    let mut type_masks = vec![JobType::GENERAL; lane_count];

    if lane_count == 1 || !renderer_multithreaded {
        type_masks[0] |= JobType::GPU_RESOURCE | JobType::RESOURCE_LOAD;
    } else if lane_count == 2 {
        type_masks[0] |= JobType::GPU_RESOURCE;
        type_masks[1] |= JobType::RESOURCE_LOAD;
    } else {
        type_masks[0] = JobType::GPU_RESOURCE;
        type_masks[1] = JobType::RESOURCE_LOAD;
    }

    log::debug!(
        "Job lanes: {} (renderer multithreaded: {})",
        lane_count,
        renderer_multithreaded
    );

    Ok(JobSystemConfig { type_masks })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(hardware: usize, multithreaded: bool) -> Vec<JobType> {
        partition_job_lanes(hardware, multithreaded, MAX_JOB_LANES)
            .unwrap()
            .type_masks
    }

    #[test]
    fn test_single_hardware_thread_is_fatal() {
        let err = partition_job_lanes(1, true, MAX_JOB_LANES).unwrap_err();
        assert!(matches!(err, SystemError::InsufficientThreads { hardware_threads: 1 }));

        assert!(partition_job_lanes(0, false, MAX_JOB_LANES).is_err());
    }

    #[test]
    fn test_one_lane_takes_everything() {
        let masks = lanes(2, false);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0], JobType::GENERAL | JobType::GPU_RESOURCE | JobType::RESOURCE_LOAD);

        // Same result when the renderer could multithread
        assert_eq!(lanes(2, true), masks);
    }

    #[test]
    fn test_two_lanes_split_specialized_work() {
        let masks = lanes(3, true);
        assert_eq!(
            masks,
            vec![
                JobType::GENERAL | JobType::GPU_RESOURCE,
                JobType::GENERAL | JobType::RESOURCE_LOAD,
            ]
        );
    }

    #[test]
    fn test_many_lanes_dedicate_first_two() {
        let masks = lanes(5, true);
        assert_eq!(
            masks,
            vec![
                JobType::GPU_RESOURCE,
                JobType::RESOURCE_LOAD,
                JobType::GENERAL,
                JobType::GENERAL,
            ]
        );
    }

    #[test]
    fn test_single_threaded_renderer_folds_onto_lane_zero() {
        let masks = lanes(8, false);
        assert_eq!(masks.len(), 7);
        assert_eq!(masks[0], JobType::GENERAL | JobType::GPU_RESOURCE | JobType::RESOURCE_LOAD);
        assert!(masks[1..].iter().all(|mask| *mask == JobType::GENERAL));
    }

    #[test]
    fn test_lane_count_is_capped() {
        let config = partition_job_lanes(20, true, MAX_JOB_LANES).unwrap();
        assert_eq!(config.lane_count(), 15);

        let smaller = partition_job_lanes(20, true, 4).unwrap();
        assert_eq!(smaller.lane_count(), 4);

        // Caps above the hard limit are clamped
        let clamped = partition_job_lanes(64, true, 100).unwrap();
        assert_eq!(clamped.lane_count(), MAX_JOB_LANES);
    }

    #[test]
    fn test_lanes_for_job_type() {
        let config = partition_job_lanes(5, true, MAX_JOB_LANES).unwrap();

        assert_eq!(config.lanes_for(JobType::GPU_RESOURCE).collect::<Vec<_>>(), vec![0]);
        assert_eq!(config.lanes_for(JobType::RESOURCE_LOAD).collect::<Vec<_>>(), vec![1]);
        assert_eq!(config.lanes_for(JobType::GENERAL).collect::<Vec<_>>(), vec![2, 3]);
    }
}
