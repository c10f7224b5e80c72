//! Queue of scheduled registry checks, ordered by due time.
//!
//! Nodes live in persistent storage keyed by id and are linked through
//! `next`. A job due no earlier than the tail is appended; an earlier one is
//! linked in after the last node due at or before it, so jobs due at the same
//! time stay FIFO. Consumption only ever takes the head. Ids are handed out
//! sequentially and never reused; a node that leaves the queue stays readable
//! as history.

use shared::constants::NO_CRONJOB;
use shared::types::{CronjobType, Timestamp};
use soroban_sdk::Env;

use crate::storage::{get_cronjob, get_cronjob_list, next_cronjob_id, set_cronjob, set_cronjob_list};
use crate::types::{CronjobList, CronjobNode};

/// Link a new job in due order. Returns the new node id.
pub fn enqueue(env: &Env, external_id: u64, job_type: CronjobType, due: Timestamp) -> u64 {
    let id = next_cronjob_id(env);
    let mut node = CronjobNode {
        id,
        external_id,
        job_type,
        due,
        next: NO_CRONJOB,
    };

    let mut list = get_cronjob_list(env);
    match predecessor(env, &list, due) {
        None if list.size == 0 => {
            list.head = id;
            list.tail = id;
        }
        None => {
            node.next = list.head;
            list.head = id;
        }
        Some(mut previous) => {
            node.next = previous.next;
            previous.next = id;
            set_cronjob(env, &previous);
            if list.tail == previous.id {
                list.tail = id;
            }
        }
    }
    set_cronjob(env, &node);

    list.size += 1;
    set_cronjob_list(env, &list);

    id
}

/// Pop the head if it is due at `now`.
pub fn take_due(env: &Env, now: Timestamp) -> Option<CronjobNode> {
    let mut list = get_cronjob_list(env);
    if list.size == 0 {
        return None;
    }
    let head = get_cronjob(env, list.head)?;
    if head.due > now {
        return None;
    }

    list.size -= 1;
    if list.size == 0 {
        list.head = NO_CRONJOB;
        list.tail = NO_CRONJOB;
    } else {
        list.head = head.next;
    }
    set_cronjob_list(env, &list);

    Some(head)
}

/// Last node due at or before `due`, or None when the job belongs at the head
fn predecessor(env: &Env, list: &CronjobList, due: Timestamp) -> Option<CronjobNode> {
    if list.size == 0 {
        return None;
    }
    let tail = get_cronjob(env, list.tail)?;
    if tail.due <= due {
        return Some(tail);
    }

    let mut previous: Option<CronjobNode> = None;
    let mut cursor = list.head;
    while cursor != list.tail {
        let node = get_cronjob(env, cursor)?;
        if node.due > due {
            break;
        }
        cursor = node.next;
        previous = Some(node);
    }
    previous
}
