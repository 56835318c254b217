mod test_call_and_hang_up;
