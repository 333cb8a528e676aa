mod slotted_queue;

pub(crate) use slotted_queue::SlottedQueue;
