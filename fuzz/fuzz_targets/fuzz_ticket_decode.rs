#![no_main]

use libfuzzer_sys::fuzz_target;
use veildraw_core::accounts::TicketAccount;

fuzz_target!(|data: &[u8]| {
    if let Ok(ticket) = TicketAccount::decode(data) {
        let encoded = ticket.encode();
        assert_eq!(encoded.as_slice(), data);
        let again = TicketAccount::decode(&encoded).expect("re-decode");
        assert_eq!(again, ticket);
    }
});
