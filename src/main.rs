use log::info;

use patchbay::{config::PanelConfig, PanelEvent, Panel, Session};

const DEMO: &str = include_str!("../demos/panel.xhtml");

fn main() -> patchbay::Result<()> {
    env_logger::init();

    let panel = Panel::from_markup(DEMO, PanelConfig::default())?;
    let scene = panel.scene();
    let mut session = Session::new(panel, scene);

    let tx = session.sender();
    for id in ["lamp", "lamp", "wave", "gain"] {
        tx.click(id);
    }
    tx.send(PanelEvent::ControlChanged { id: "gainSlider".into(), value: 1.5 });
    info!("handled {} events", session.pump()?);

    for node in session.panel().nodes() {
        let class = session.scene().class_of(node.id()).unwrap_or_default();
        println!("{:>6}: {}", node.id(), class);
    }
    print!("{}", session.scene().stage.to_svg());
    Ok(())
}
