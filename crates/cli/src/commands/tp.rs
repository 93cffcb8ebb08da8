use cmdtree_core::SINGLE_SUCCESS;
use cmdtree_dsl::{DslCommand, int};

/// `tp <x> [y]`
pub fn command() -> DslCommand<String> {
    cmdtree_dsl::command("tp", |b| {
        let x = b.inline(int("x"))?;
        let y = b.inline(int("y").default(0))?;
        b.executes(move |ctx| {
            let (x, y) = (x.get(ctx)?, y.get(ctx)?);
            println!("Teleported {} to ({x}, {y})", ctx.source());
            Ok(SINGLE_SUCCESS)
        })
    })
}
