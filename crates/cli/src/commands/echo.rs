use cmdtree_core::CommandError;
use cmdtree_dsl::{DslCommand, greedy_string};

/// `echo <text...>`; returns the length of the echoed text.
pub fn command() -> DslCommand<String> {
    cmdtree_dsl::command("echo", |b| {
        let text = b.inline(greedy_string("text"))?;
        // Deferred read through the tree's context cell.
        b.executes(move |_| {
            let text = text.value()?;
            println!("{text}");
            length_status(text.len())
        })
    })
}

fn length_status(len: usize) -> Result<i32, CommandError> {
    i32::try_from(len).map_err(|_| CommandError::Failed(format!("{len} bytes is too long to report")))
}
