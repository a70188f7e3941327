use super::super::{ClientId, TagMask};
use super::{Outcome, State};

/// Shows exactly `tags` on the selected monitor. A zero mask swaps back to
/// the previously shown tags.
pub fn view(state: &mut State, tags: u32) -> Outcome {
    let m = state.selected_monitor;
    let all = state.config.tag_mask();
    let Some(mon) = state.monitors.get_mut(m) else {
        return Outcome::default();
    };

    let requested = TagMask::from_mask(tags).intersection(all);
    if tags == 0 {
        if mon.previous_visible_tags == mon.visible_tags {
            return Outcome::default();
        }
        std::mem::swap(&mut mon.visible_tags, &mut mon.previous_visible_tags);
    } else {
        if requested.is_empty() || requested == mon.visible_tags {
            return Outcome::default();
        }
        mon.previous_visible_tags = mon.visible_tags;
        mon.visible_tags = requested;
    }

    tracing::info!(
        "View on monitor {}: {} -> {}",
        m,
        mon.previous_visible_tags,
        mon.visible_tags
    );
    state.refocus_and_arrange(m)
}

pub fn toggle_view(state: &mut State, tags: u32) -> Outcome {
    let m = state.selected_monitor;
    let all = state.config.tag_mask();
    let Some(mon) = state.monitors.get_mut(m) else {
        return Outcome::default();
    };

    let toggled = mon
        .visible_tags
        .toggle(TagMask::from_mask(tags).intersection(all));
    if toggled.is_empty() || toggled == mon.visible_tags {
        return Outcome::default();
    }

    tracing::info!(
        "Toggle view on monitor {}: {} -> {}",
        m,
        mon.visible_tags,
        toggled
    );
    mon.visible_tags = toggled;
    state.refocus_and_arrange(m)
}

/// Moves the selected client to exactly `tags`.
pub fn tag(state: &mut State, tags: u32) -> Outcome {
    let Some(id) = state.selected_client() else {
        return Outcome::default();
    };
    let requested = TagMask::from_mask(tags).intersection(state.config.tag_mask());
    if requested.is_empty() {
        return Outcome::default();
    }
    set_client_tags(state, id, requested)
}

pub fn toggle_tag(state: &mut State, tags: u32) -> Outcome {
    let Some(id) = state.selected_client() else {
        return Outcome::default();
    };
    let Some(client) = state.clients.get(&id) else {
        return Outcome::default();
    };
    let toggled = client
        .tags
        .toggle(TagMask::from_mask(tags).intersection(state.config.tag_mask()));
    if toggled.is_empty() {
        return Outcome::default();
    }
    set_client_tags(state, id, toggled)
}

fn set_client_tags(state: &mut State, id: ClientId, tags: TagMask) -> Outcome {
    let Some(client) = state.clients.get_mut(&id) else {
        return Outcome::default();
    };
    if client.tags == tags {
        return Outcome::default();
    }
    tracing::info!("Tag window {}: {} -> {}", id, client.tags, tags);
    client.tags = tags;
    let m = client.monitor;
    state.refocus_and_arrange(m)
}
