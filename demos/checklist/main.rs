//! Two checked rows and an "add" key. Toggle with space, add with `a`,
//! quit with `q`.

use bubbletea_recycler::checklist::Model as Checklist;
use bubbletea_rs::{Cmd, Model, Msg, Program};

struct App {
    checklist: Checklist,
}

impl Model for App {
    fn init() -> (Self, Option<Cmd>) {
        let (checklist, cmd) = Checklist::init();
        (Self { checklist }, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.checklist.update(msg)
    }

    fn view(&self) -> String {
        self.checklist.view()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;
    Ok(())
}
