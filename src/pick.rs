//! Object picking and selection.
//!
//! Picking happens on the CPU against the same [`Render`] values the frame is
//! drawn from:
//! 1. Collect every flow's render tree and remember which flow claimed which ID
//! 2. Test the cursor against the screen rectangles of GUI elements; the one
//!    drawn last sits on top and wins
//! 3. Otherwise cast a ray through the cursor and take the nearest world-space
//!    bounding box it hits
//! 4. Return the selected ID together with the flows that own it
//!
//! Step 4 makes sure that only the flows responsible for the selected object
//! are invoked.
//!
//! [`Render`]: crate::render::Render

use std::collections::{HashMap, HashSet};

use winit::dpi::PhysicalPosition;

use crate::{
    camera::Ray,
    context::{Context, MouseState},
    data_structures::bounds::BoundingBox,
    flow::GraphicsFlow,
    render::{Flat, Instanced},
    ui::Rect,
};

/// Determine which object is under the cursor.
///
/// # Returns
///
/// `Some((pick_id, flow_ids))` if an object was hit, `None` otherwise.
pub fn pick<State, Event>(
    flows: &[Box<dyn GraphicsFlow<State, Event>>],
    ctx: &Context,
    mouse_state: &MouseState,
) -> Option<(u32, HashSet<usize>)> {
    let mut translation: HashMap<u32, HashSet<usize>> = HashMap::new();
    let mut basics: Vec<Instanced> = Vec::new();
    let mut flats: Vec<Flat> = Vec::new();
    for (flow_id, flow) in flows.iter().enumerate() {
        let render = flow.on_render();
        render.map_ids(flow_id, &mut translation);
        render.pick_targets(&mut basics, &mut flats);
    }

    let ray = ctx.camera.camera.cast_ray_from_mouse(
        mouse_state.coords,
        ctx.config.width as f32,
        ctx.config.height as f32,
        &ctx.projection,
    );
    let pick_id = pick_id(
        flats.iter().map(|flat| (flat.id, flat.rect)),
        basics
            .iter()
            .filter(|instanced| instanced.amount > 0)
            .map(|instanced| (instanced.id, instanced.bounds)),
        mouse_state.coords,
        ray.as_ref(),
    )?;
    log::debug!("Picked render ID {}", pick_id);

    match translation.remove(&pick_id) {
        Some(flow_ids) => Some((pick_id, flow_ids)),
        None => {
            log::warn!("Render ID {} was hit but no flow claims it", pick_id);
            None
        }
    }
}

/// Resolves the render ID under the cursor from screen rectangles (in draw
/// order) and world-space boxes.
pub(crate) fn pick_id(
    rects: impl DoubleEndedIterator<Item = (u32, Rect)>,
    boxes: impl Iterator<Item = (u32, BoundingBox)>,
    coords: PhysicalPosition<f64>,
    ray: Option<&Ray>,
) -> Option<u32> {
    if let Some((id, _)) = rects.rev().find(|(_, rect)| rect.contains(coords)) {
        return Some(id);
    }
    let ray = ray?;
    boxes
        .filter_map(|(id, bounds)| bounds.intersect_ray(ray).map(|t| (id, t)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;

    fn unit_box(center: Vector3<f32>) -> BoundingBox {
        BoundingBox::from_center_extents(center, Vector3::new(1.0, 1.0, 1.0))
    }

    fn ray_down_z() -> Ray {
        Ray {
            origin: Vector3::new(0.0, 0.0, 10.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        }
    }

    fn rect(y: f32) -> Rect {
        Rect {
            x: 0.0,
            y,
            width: 100.0,
            height: 100.0,
        }
    }

    #[test]
    fn nearest_box_wins() {
        let boxes = vec![
            (1, unit_box(Vector3::new(0.0, 0.0, 0.0))),
            (2, unit_box(Vector3::new(0.0, 0.0, 3.0))),
            (3, unit_box(Vector3::new(5.0, 0.0, 5.0))),
        ];
        let hit = pick_id(
            std::iter::empty(),
            boxes.into_iter(),
            PhysicalPosition::new(500.0, 500.0),
            Some(&ray_down_z()),
        );
        assert_eq!(hit, Some(2));
    }

    #[test]
    fn gui_is_tested_before_the_scene() {
        let hit = pick_id(
            vec![(10, rect(0.0))].into_iter(),
            vec![(1, unit_box(Vector3::new(0.0, 0.0, 0.0)))].into_iter(),
            PhysicalPosition::new(50.0, 50.0),
            Some(&ray_down_z()),
        );
        assert_eq!(hit, Some(10));
    }

    #[test]
    fn topmost_rect_wins() {
        let hit = pick_id(
            vec![(10, rect(0.0)), (11, rect(50.0))].into_iter(),
            std::iter::empty(),
            PhysicalPosition::new(50.0, 75.0),
            None,
        );
        assert_eq!(hit, Some(11));
    }

    #[test]
    fn miss_returns_none() {
        let hit = pick_id(
            vec![(10, rect(0.0))].into_iter(),
            vec![(1, unit_box(Vector3::new(5.0, 5.0, 0.0)))].into_iter(),
            PhysicalPosition::new(500.0, 500.0),
            Some(&ray_down_z()),
        );
        assert_eq!(hit, None);
    }
}
