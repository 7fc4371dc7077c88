// Datagram reassembly over arbitrarily split input.

#[cfg(test)]
mod tests {
    use std::thread::sleep;
    use std::time::Duration;

    use proptest::prelude::*;
    use pcapnet_core::destick::{datagram_len, DestickError, Desticker, FrameExtractor};

    fn ipv4_packet(payload: &[u8]) -> Vec<u8> {
        let total = (20 + payload.len()) as u16;
        let mut p = vec![
            0x45, 0x00, (total >> 8) as u8, total as u8,
            0x00, 0x01, 0x00, 0x00,
            0x40, 0x11, 0x00, 0x00,
            10, 0, 0, 1,
            10, 0, 0, 2,
        ];
        p.extend_from_slice(payload);
        p
    }

    fn ipv6_packet(payload: &[u8]) -> Vec<u8> {
        let len = payload.len() as u16;
        let mut p = vec![0x60, 0x00, 0x00, 0x00, (len >> 8) as u8, len as u8, 0x11, 0x40];
        p.extend_from_slice(&[0u8; 15]);
        p.push(1);
        p.extend_from_slice(&[0u8; 15]);
        p.push(2);
        p.extend_from_slice(payload);
        p
    }

    // --- datagram_len ---

    #[test]
    fn length_needs_header_prefix() {
        assert_eq!(datagram_len(&[]), Ok(None));
        assert_eq!(datagram_len(&[0x45, 0x00, 0x00]), Ok(None));
        assert_eq!(datagram_len(&[0x60, 0, 0, 0, 0]), Ok(None));
    }

    #[test]
    fn length_reads_both_families() {
        assert_eq!(datagram_len(&ipv4_packet(b"abcd")), Ok(Some(24)));
        assert_eq!(datagram_len(&ipv6_packet(b"abcd")), Ok(Some(44)));
    }

    #[test]
    fn length_rejects_bad_headers() {
        assert_eq!(datagram_len(&[0x15, 0, 0, 20]), Err(DestickError::InvalidVersion(1)));
        assert!(matches!(datagram_len(&[0x44, 0, 0, 20]), Err(DestickError::Malformed(_))));
        assert!(matches!(datagram_len(&[0x45, 0, 0, 19]), Err(DestickError::Malformed(_))));
    }

    // --- Desticker ---

    #[test]
    fn whole_datagram_passes_through() {
        let mut d = Desticker::new();
        let p = ipv4_packet(b"hello");

        let frames = d.append(&p).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_ref(), p.as_slice());
        assert_eq!(d.buffered(), 0);
        assert!(d.pending_age().is_none());
    }

    #[test]
    fn coalesced_datagrams_split_in_order() {
        let mut d = Desticker::new();
        let a = ipv4_packet(b"first");
        let b = ipv6_packet(b"second");
        let c = ipv4_packet(b"");

        let mut wire = a.clone();
        wire.extend_from_slice(&b);
        wire.extend_from_slice(&c);

        let frames = d.append(&wire).unwrap();
        let got: Vec<&[u8]> = frames.iter().map(|f| f.as_ref()).collect();
        assert_eq!(got, vec![a.as_slice(), b.as_slice(), c.as_slice()]);
    }

    #[test]
    fn byte_at_a_time_reassembles() {
        let mut d = Desticker::new();
        let p = ipv6_packet(&[7u8; 33]);
        let mut out = Vec::new();

        for (i, byte) in p.iter().enumerate() {
            let frames = d.append(std::slice::from_ref(byte)).unwrap();
            if i + 1 < p.len() {
                assert!(frames.is_empty());
                assert_eq!(d.buffered(), i + 1);
            }
            out.extend(frames);
        }

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref(), p.as_slice());
    }

    #[test]
    fn invalid_version_resets_buffer() {
        let mut d = Desticker::new();
        assert_eq!(d.append(&[0x20, 0, 0, 0]), Err(DestickError::InvalidVersion(2)));
        assert_eq!(d.buffered(), 0);

        // Recovers on the next well-formed datagram.
        let p = ipv4_packet(b"ok");
        assert_eq!(d.append(&p).unwrap().len(), 1);
    }

    #[test]
    fn stale_partial_fails_next_append() {
        let mut d = Desticker::new();
        d.set_deadline(Duration::from_millis(20));

        let p = ipv4_packet(&[1u8; 40]);
        assert!(d.append(&p[..8]).unwrap().is_empty());
        sleep(Duration::from_millis(60));

        match d.append(&p[8..]) {
            Err(DestickError::Stale { buffered, deadline, age }) => {
                assert_eq!(buffered, 8);
                assert_eq!(deadline, Duration::from_millis(20));
                assert!(age > deadline);
            }
            other => panic!("expected stale error, got {:?}", other),
        }
        assert_eq!(d.buffered(), 0);

        // A fresh datagram is accepted after the stale bytes are dropped.
        assert_eq!(d.append(&p).unwrap().len(), 1);
    }

    #[test]
    fn completion_restarts_clock() {
        let mut d = Desticker::new();
        d.set_deadline(Duration::from_millis(150));

        let a = ipv4_packet(b"aaaa");
        let b = ipv4_packet(b"bbbb");

        d.append(&a[..5]).unwrap();
        sleep(Duration::from_millis(100));

        // Completes `a` and leaves part of `b` pending with a fresh clock.
        let mut wire = a[5..].to_vec();
        wire.extend_from_slice(&b[..5]);
        assert_eq!(d.append(&wire).unwrap().len(), 1);

        sleep(Duration::from_millis(100));
        let frames = d.append(&b[5..]).unwrap();
        assert_eq!(frames[0].as_ref(), b.as_slice());
    }

    #[test]
    fn empty_buffer_never_goes_stale() {
        let mut d = Desticker::new();
        d.set_deadline(Duration::from_millis(1));
        d.append(&ipv4_packet(b"x")).unwrap();
        sleep(Duration::from_millis(10));
        assert_eq!(d.append(&ipv4_packet(b"y")).unwrap().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_any_split_yields_same_datagrams(
            payloads in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..300), 1..8),
            cuts in proptest::collection::vec(1usize..97, 1..40),
        ) {
            let packets: Vec<Vec<u8>> = payloads
                .iter()
                .enumerate()
                .map(|(i, p)| if i % 2 == 0 { ipv4_packet(p) } else { ipv6_packet(p) })
                .collect();
            let wire: Vec<u8> = packets.concat();

            let mut d = Desticker::new();
            let mut out = Vec::new();
            let mut pos = 0;
            let mut cut = cuts.iter().cycle();
            while pos < wire.len() {
                let n = (*cut.next().unwrap()).min(wire.len() - pos);
                out.extend(d.append(&wire[pos..pos + n]).unwrap());
                pos += n;
            }

            prop_assert_eq!(d.buffered(), 0);
            let got: Vec<Vec<u8>> = out.iter().map(|b| b.to_vec()).collect();
            prop_assert_eq!(got, packets);
        }
    }
}
