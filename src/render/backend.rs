use crate::{
    compose::plan::{DrawOp, DrawPlan},
    foundation::{core::Canvas, error::OgResult},
};

/// Interprets a [`DrawPlan`] one op at a time.
pub trait DrawBackend {
    type Output;

    fn begin(&mut self, canvas: Canvas) -> OgResult<()>;

    fn draw(&mut self, op: &DrawOp) -> OgResult<()>;

    fn finish(&mut self) -> OgResult<Self::Output>;
}

pub fn execute_plan<B: DrawBackend + ?Sized>(
    backend: &mut B,
    plan: &DrawPlan,
) -> OgResult<B::Output> {
    backend.begin(plan.canvas)?;
    for op in &plan.ops {
        backend.draw(op)?;
    }
    backend.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
