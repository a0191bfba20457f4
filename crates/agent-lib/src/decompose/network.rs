use crate::models::{InterfaceStats, MetricPoint};

const PLUGIN: &str = "net";

pub(crate) fn decompose(interfaces: &[InterfaceStats], out: &mut Vec<MetricPoint>) {
    for (index, interface) in interfaces.iter().enumerate() {
        let instance = format!("if{index}");

        // the duplex counter types expect one [rx, tx] tuple per point,
        // not two separate points
        for (type_name, rx, tx) in [
            ("if_dropped", interface.rx_dropped, interface.tx_dropped),
            ("if_packets", interface.rx_packets, interface.tx_packets),
            ("if_octets", interface.rx_bytes, interface.tx_bytes),
            ("if_errors", interface.rx_errors, interface.tx_errors),
        ] {
            out.push(MetricPoint::new(
                PLUGIN,
                Some(instance.clone()),
                type_name,
                None,
                vec![rx as f64, tx as f64],
            ));
        }
    }
}
