mod installer;
mod link_stats;
mod queue_monitor;
mod recording_stack;
mod topology;
